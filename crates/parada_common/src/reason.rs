//! Reason classification and display colors.
//!
//! Both the distribution chart and the history-table badges color a
//! stoppage by its reason. The mapping lives here and nowhere else so
//! the two surfaces can never disagree.

use ratatui::style::Color;

/// Display category for a free-text stoppage reason.
///
/// Classification is substring-based, case-insensitive and
/// priority-ordered: a reason matching several keywords always
/// resolves to the earliest rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonCategory {
    /// Contains "material".
    MaterialShortage,
    /// Contains "manuten" (stem of "manutenção").
    Maintenance,
    /// Contains "setup".
    Setup,
    /// Contains "almoço" or "intervalo".
    Break,
    /// Anything else, including an absent reason.
    NoReason,
}

impl ReasonCategory {
    /// Classify a raw reason. Total: never fails.
    pub fn classify(reason: Option<&str>) -> Self {
        let Some(raw) = reason else {
            return ReasonCategory::NoReason;
        };
        let r = raw.to_lowercase();
        let r = r.trim();

        if r.contains("material") {
            ReasonCategory::MaterialShortage
        } else if r.contains("manuten") {
            ReasonCategory::Maintenance
        } else if r.contains("setup") {
            ReasonCategory::Setup
        } else if r.contains("almoço") || r.contains("intervalo") {
            ReasonCategory::Break
        } else {
            ReasonCategory::NoReason
        }
    }

    /// Terminal color for this category, shared by chart slices and
    /// table badges.
    pub fn color(self) -> Color {
        match self {
            ReasonCategory::MaterialShortage => Color::Yellow,
            ReasonCategory::Maintenance => Color::Red,
            ReasonCategory::Setup => Color::Blue,
            ReasonCategory::Break => Color::Magenta,
            ReasonCategory::NoReason => Color::Gray,
        }
    }

}

/// Color for a raw reason string, the one lookup both UI surfaces use.
pub fn color_for(reason: Option<&str>) -> Color {
    ReasonCategory::classify(reason).color()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_and_deterministic() {
        let a = color_for(Some("Falta de material"));
        let b = color_for(Some("FALTA DE MATERIAL"));
        let c = color_for(Some("material em falta"));
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a, ReasonCategory::MaterialShortage.color());
    }

    #[test]
    fn test_absent_reason_is_no_reason() {
        assert_eq!(color_for(None), ReasonCategory::NoReason.color());
        assert_eq!(
            ReasonCategory::classify(Some("motivo qualquer")),
            ReasonCategory::NoReason
        );
    }

    #[test]
    fn test_priority_order_breaks_ties() {
        // Matches both "setup" and "material"; material is rule 1.
        assert_eq!(
            ReasonCategory::classify(Some("setup por falta de material")),
            ReasonCategory::MaterialShortage
        );
        // Matches both "manuten" and "setup"; maintenance is rule 2.
        assert_eq!(
            ReasonCategory::classify(Some("setup de manutenção")),
            ReasonCategory::Maintenance
        );
    }

    #[test]
    fn test_break_keywords() {
        assert_eq!(
            ReasonCategory::classify(Some("Almoço/Intervalo")),
            ReasonCategory::Break
        );
        assert_eq!(
            ReasonCategory::classify(Some("intervalo da tarde")),
            ReasonCategory::Break
        );
    }
}
