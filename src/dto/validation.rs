//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a player ID is present. Any non-empty string is a valid key.
///
/// # Examples
///
/// ```ignore
/// validate_player_id("p1")    // Ok
/// validate_player_id("   ")   // Ok - stored as given
/// validate_player_id("")      // Err - empty
/// ```
pub fn validate_player_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() {
        let mut err = ValidationError::new("player_id_empty");
        err.message = Some("Player ID must not be empty".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_player_id_valid() {
        assert!(validate_player_id("p1").is_ok());
        assert!(validate_player_id("julian-7f3a").is_ok());
        assert!(validate_player_id(" \t").is_ok());
        assert!(validate_player_id(&"x".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_player_id_empty() {
        assert!(validate_player_id("").is_err());
    }
}
