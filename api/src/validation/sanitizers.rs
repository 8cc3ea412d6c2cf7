//! Input sanitization functions
//!
//! Sanitizers run before validation and must be idempotent.

/// Trim leading and trailing whitespace from a string
pub fn trim(value: &str) -> String {
    value.trim().to_string()
}

/// Trim a string in place, avoiding a reallocation when nothing changes
pub fn trim_in_place(value: &mut String) {
    if value.trim().len() != value.len() {
        *value = trim(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim() {
        assert_eq!(trim("  Ada \n"), "Ada");
        assert_eq!(trim("Ada"), "Ada");
    }

    #[test]
    fn test_trim_in_place_is_idempotent() {
        let mut value = "\t Ada Lovelace  ".to_string();
        trim_in_place(&mut value);
        assert_eq!(value, "Ada Lovelace");
        trim_in_place(&mut value);
        assert_eq!(value, "Ada Lovelace");
    }
}
