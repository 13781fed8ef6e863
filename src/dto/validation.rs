//! Validation helpers for DTOs.

use validator::ValidationError;

/// Validates that a handle is 3 to 32 characters of lowercase letters,
/// digits, or underscores, starting with a letter.
///
/// # Examples
///
/// ```ignore
/// validate_handle("iron_mike")  // Ok
/// validate_handle("Iron Mike")  // Err - uppercase and space
/// validate_handle("x")          // Err - too short
/// ```
pub fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    if handle.len() < 3 || handle.len() > 32 {
        let mut err = ValidationError::new("handle_length");
        err.message = Some(
            format!(
                "handle must be between 3 and 32 characters (got {})",
                handle.len()
            )
            .into(),
        );
        return Err(err);
    }

    let mut chars = handle.chars();
    let starts_with_letter = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase());
    if !starts_with_letter
        || !handle
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        let mut err = ValidationError::new("handle_format");
        err.message = Some(
            "handle must start with a lowercase letter and contain only lowercase letters, digits, or underscores"
                .into(),
        );
        return Err(err);
    }

    Ok(())
}

/// Validates a fight clock value of the form `M:SS` or `MM:SS` with seconds
/// below 60.
pub fn validate_fight_time(value: &str) -> Result<(), ValidationError> {
    let invalid = || {
        let mut err = ValidationError::new("fight_time_format");
        err.message = Some("time must look like `4:32` with seconds below 60".into());
        err
    };

    let (minutes, seconds) = value.split_once(':').ok_or_else(invalid)?;
    if minutes.is_empty() || minutes.len() > 2 || seconds.len() != 2 {
        return Err(invalid());
    }

    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u32 = seconds.parse().map_err(|_| invalid())?;
    if minutes > 59 || seconds > 59 {
        return Err(invalid());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_handle_valid() {
        assert!(validate_handle("iron_mike").is_ok());
        assert!(validate_handle("abc").is_ok());
        assert!(validate_handle("fighter_2026").is_ok());
    }

    #[test]
    fn test_validate_handle_invalid_length() {
        assert!(validate_handle("ab").is_err()); // too short
        assert!(validate_handle(&"a".repeat(33)).is_err()); // too long
        assert!(validate_handle("").is_err()); // empty
    }

    #[test]
    fn test_validate_handle_invalid_format() {
        assert!(validate_handle("Iron_Mike").is_err()); // uppercase
        assert!(validate_handle("1fighter").is_err()); // leading digit
        assert!(validate_handle("_fighter").is_err()); // leading underscore
        assert!(validate_handle("iron mike").is_err()); // space
    }

    #[test]
    fn test_validate_fight_time() {
        assert!(validate_fight_time("4:32").is_ok());
        assert!(validate_fight_time("0:05").is_ok());
        assert!(validate_fight_time("12:59").is_ok());

        assert!(validate_fight_time("4:60").is_err()); // seconds overflow
        assert!(validate_fight_time("4:5").is_err()); // short seconds
        assert!(validate_fight_time("432").is_err()); // no separator
        assert!(validate_fight_time(":32").is_err()); // missing minutes
    }
}
