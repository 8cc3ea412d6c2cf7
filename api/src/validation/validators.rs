//! Field validators for input validation

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Local part, `@`, dot-separated domain labels and an alphabetic TLD.
    /// Leading dots and `..` are rejected separately (no lookaround in `regex`).
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)^[A-Z0-9_'+\-.]*[A-Z0-9_+\-]@([A-Z0-9][A-Z0-9\-]*\.)+[A-Z]{2,}$").unwrap();
}

/// Validate that a string is a syntactically valid email address
pub fn validate_email(value: &str) -> Result<(), String> {
    if value.starts_with('.') || value.contains("..") || !EMAIL_REGEX.is_match(value) {
        return Err("must be a valid email address".to_string());
    }
    Ok(())
}
