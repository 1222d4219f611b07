//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::game::GridSize;

/// Validates that a game mode names a supported grid, either as `"N"` or `"NxN"`.
///
/// # Examples
///
/// ```ignore
/// validate_game_mode("5")   // Ok
/// validate_game_mode("6x6") // Ok
/// validate_game_mode("3")   // Err - unsupported size
/// ```
pub fn validate_game_mode(value: &str) -> Result<(), ValidationError> {
    value.parse::<GridSize>().map(|_| ()).map_err(|err| {
        let mut error = ValidationError::new("game_mode");
        error.message = Some(err.to_string().into());
        error
    })
}

/// Validates that a player name is not blank.
pub fn validate_player_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        let mut err = ValidationError::new("name_blank");
        err.message = Some("Player name must not be blank".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_game_mode_valid() {
        assert!(validate_game_mode("4").is_ok());
        assert!(validate_game_mode("5x5").is_ok());
        assert!(validate_game_mode("6").is_ok());
    }

    #[test]
    fn test_validate_game_mode_invalid() {
        assert!(validate_game_mode("7").is_err());
        assert!(validate_game_mode("4x6").is_err());
        assert!(validate_game_mode("").is_err());
    }

    #[test]
    fn test_validate_player_name() {
        assert!(validate_player_name("Alice").is_ok());
        assert!(validate_player_name("   ").is_err());
    }
}
