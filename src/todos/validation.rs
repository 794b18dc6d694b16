//! Input validation for todo bodies.

use crate::error::ApiError;
use crate::todos::types::TodoInput;

/// Maximum accepted title length in bytes.
pub const MAX_TITLE_LEN: usize = 255;

/// Validate a create/update body.
pub fn validate_input(input: &TodoInput) -> Result<(), ApiError> {
    if input.title.trim().is_empty() {
        return Err(ApiError::TitleRequired);
    }
    if input.title.len() > MAX_TITLE_LEN {
        return Err(ApiError::TitleTooLong);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str) -> TodoInput {
        TodoInput {
            title: title.to_string(),
            is_complete: false,
        }
    }

    #[test]
    fn accepts_a_normal_title() {
        assert!(validate_input(&input("buy milk")).is_ok());
    }

    #[test]
    fn rejects_empty_title() {
        let err = validate_input(&input("")).unwrap_err();
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn rejects_whitespace_only_title() {
        let err = validate_input(&input("   \t ")).unwrap_err();
        assert_eq!(err.to_string(), "title is required");
    }

    #[test]
    fn accepts_title_at_the_limit() {
        assert!(validate_input(&input(&"a".repeat(MAX_TITLE_LEN))).is_ok());
    }

    #[test]
    fn rejects_title_over_the_limit() {
        let err = validate_input(&input(&"a".repeat(MAX_TITLE_LEN + 1))).unwrap_err();
        assert_eq!(err.to_string(), "title must be 255 characters or fewer");
    }
}
