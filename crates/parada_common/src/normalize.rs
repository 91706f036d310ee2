//! Text normalization for machine-name matching.
//!
//! Machine tags arrive as free text ("Máquina 01", "maquina 01",
//! " MAQUINA 01 ") and must all scope to the same machine. Two names
//! are the same machine iff their normalized forms are equal.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize free text: NFD-decompose, drop combining diacritical
/// marks, lowercase, trim.
pub fn normalize(text: &str) -> String {
    text.nfd()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// Whether two machine names refer to the same machine.
pub fn same_machine(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}

/// Whether a record's machine tag belongs to the monitored machine.
///
/// Records without a machine tag are assumed to belong to the single
/// monitored machine and always match.
pub fn belongs_to(machine: Option<&str>, monitored: &str) -> bool {
    match machine {
        None => true,
        Some(m) if m.is_empty() => true,
        Some(m) => same_machine(m, monitored),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_accents_and_case() {
        assert_eq!(normalize("MÁQUINA 01"), "maquina 01");
        assert_eq!(normalize("maquina 01"), "maquina 01");
        assert_eq!(normalize(" Máquina 01 "), "maquina 01");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_normalize_other_diacritics() {
        assert_eq!(normalize("Manutenção"), "manutencao");
        assert_eq!(normalize("Almoço/Intervalo"), "almoco/intervalo");
    }

    #[test]
    fn test_same_machine() {
        assert!(same_machine("Máquina 01", "maquina 01"));
        assert!(!same_machine("Máquina 01", "Máquina 02"));
    }

    #[test]
    fn test_untagged_record_always_belongs() {
        assert!(belongs_to(None, "Máquina 01"));
        assert!(belongs_to(Some(""), "Máquina 01"));
    }

    #[test]
    fn test_other_machine_is_excluded() {
        assert!(belongs_to(Some("MAQUINA 01"), "Máquina 01"));
        assert!(!belongs_to(Some("Máquina 02"), "Máquina 01"));
    }
}
