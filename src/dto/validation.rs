//! Validation helpers for DTOs.

use validator::ValidationError;

/// Length of a room join code.
pub const ROOM_CODE_LENGTH: usize = 6;

/// Validates that a room code is exactly 6 uppercase alphanumeric characters.
///
/// Input is expected to be normalized to uppercase before validation; the
/// generation alphabet excludes ambiguous characters but codes are accepted
/// against the full `[A-Z0-9]` set.
///
/// # Examples
///
/// ```ignore
/// validate_room_code("XKCD42") // Ok
/// validate_room_code("xkcd42") // Err - lowercase
/// validate_room_code("XKCD4")  // Err - too short
/// ```
pub fn validate_room_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != ROOM_CODE_LENGTH {
        let mut err = ValidationError::new("room_code_length");
        err.message = Some(
            format!(
                "Room code must be exactly {} characters (got {})",
                ROOM_CODE_LENGTH,
                code.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        let mut err = ValidationError::new("room_code_format");
        err.message =
            Some("Room code must contain only uppercase letters and digits".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_room_code_valid() {
        assert!(validate_room_code("XKCD42").is_ok());
        assert!(validate_room_code("ABCDEF").is_ok());
        assert!(validate_room_code("234567").is_ok());
    }

    #[test]
    fn test_validate_room_code_invalid_length() {
        assert!(validate_room_code("XKCD4").is_err()); // too short
        assert!(validate_room_code("XKCD422").is_err()); // too long
        assert!(validate_room_code("").is_err()); // empty
    }

    #[test]
    fn test_validate_room_code_invalid_format() {
        assert!(validate_room_code("xkcd42").is_err()); // lowercase
        assert!(validate_room_code("XKCD-2").is_err()); // punctuation
        assert!(validate_room_code("XKCD 2").is_err()); // space
    }
}
