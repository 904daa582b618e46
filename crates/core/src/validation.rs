//! Shared input validation helpers.

use crate::error::LedgerError;

/// Requires `value` to be non-blank and at most `max` characters.
pub(crate) fn validate_text(field: &'static str, value: &str, max: usize) -> Result<(), LedgerError> {
    if value.trim().is_empty() {
        return Err(LedgerError::InvalidField {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    let len = value.chars().count();
    if len > max {
        return Err(LedgerError::InvalidField {
            field,
            reason: format!("must be at most {max} characters, got {len}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_text() {
        assert!(validate_text("name", "ACME", 10).is_ok());
        assert!(validate_text("name", "   ", 10).is_err());
        assert!(validate_text("name", "", 10).is_err());
        assert!(validate_text("name", "abcdefghijk", 10).is_err());
        // counts characters, not bytes
        assert!(validate_text("name", "ñññññ", 5).is_ok());
    }
}
