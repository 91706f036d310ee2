//! Registration password policy.

/// Symbols the policy accepts as "special" characters.
pub const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// Whether a password satisfies the registration policy: at least 8
/// characters with one uppercase, one lowercase, one digit and one
/// symbol from [`PASSWORD_SYMBOLS`].
pub fn validate_password(password: &str) -> bool {
    let min_length = password.chars().count() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    min_length && has_upper && has_lower && has_digit && has_symbol
}
