//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::dao::models::SESSION_ID_MAX_CHARS;

/// Validates that a session identifier is non-blank, printable and fits its column.
///
/// # Examples
///
/// ```ignore
/// validate_session_id("6f1c2d7e-3f0a-4b53-9c1e-1a2b3c4d5e6f") // Ok
/// validate_session_id("   ")                                  // Err - blank
/// validate_session_id("a\nb")                                 // Err - control character
/// ```
pub fn validate_session_id(id: &str) -> Result<(), ValidationError> {
    let length = id.chars().count();
    if id.trim().is_empty() || length > SESSION_ID_MAX_CHARS {
        let mut err = ValidationError::new("session_id_length");
        err.message = Some(
            format!(
                "Session ID must contain 1 to {SESSION_ID_MAX_CHARS} non-blank characters (got {length})"
            )
            .into(),
        );
        return Err(err);
    }

    if id.chars().any(char::is_control) {
        let mut err = ValidationError::new("session_id_format");
        err.message = Some("Session ID must not contain control characters".into());
        return Err(err);
    }

    Ok(())
}
