//! Input validation for accounts and events.
//!
//! Used by the API layer before anything reaches the store.

use validator::ValidateEmail;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const MAX_EVENT_TITLE_LENGTH: usize = 200;
pub const MAX_EVENT_TEXT_LENGTH: usize = 2000;

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Usernames are 3-32 characters of ASCII letters, digits, `_`, `-` or `.`.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(CoreError::Validation(format!(
            "username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(CoreError::Validation(
            "username may only contain letters, digits, '_', '-' and '.'".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), CoreError> {
    let owned = email.to_string();
    if !owned.validate_email() {
        return Err(CoreError::Validation(format!("'{email}' is not a valid email")));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

pub fn validate_event_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("event title is required".to_string()));
    }
    if trimmed.chars().count() > MAX_EVENT_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "event title must be at most {MAX_EVENT_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional free-text field (description, location).
pub fn validate_event_text(field: &str, value: Option<&str>) -> Result<(), CoreError> {
    if let Some(v) = value {
        if v.chars().count() > MAX_EVENT_TEXT_LENGTH {
            return Err(CoreError::Validation(format!(
                "{field} must be at most {MAX_EVENT_TEXT_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// An event may not end before it starts. Open-ended windows are fine.
pub fn validate_event_window(
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
) -> Result<(), CoreError> {
    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        if end < start {
            return Err(CoreError::Validation(
                "event cannot end before it starts".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn username_bounds() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username("alice.smith_99").is_ok());
        assert_matches!(validate_username("ab"), Err(CoreError::Validation(_)));
        assert_matches!(
            validate_username(&"x".repeat(MAX_USERNAME_LENGTH + 1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn username_rejects_spaces_and_symbols() {
        assert!(validate_username("bob smith").is_err());
        assert!(validate_username("bob@home").is_err());
    }

    #[test]
    fn email_format() {
        assert!(validate_email("alice@example.com").is_ok());
        assert_matches!(validate_email("alice"), Err(CoreError::Validation(_)));
        assert!(validate_email("").is_err());
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("12345678").is_ok());
        let err = validate_password("short").unwrap_err();
        assert!(err.message().contains("at least 8"));
    }

    #[test]
    fn title_required_and_bounded() {
        assert!(validate_event_title("standup").is_ok());
        assert!(validate_event_title("   ").is_err());
        assert!(validate_event_title(&"t".repeat(MAX_EVENT_TITLE_LENGTH + 1)).is_err());
    }

    #[test]
    fn text_fields_bounded() {
        assert!(validate_event_text("description", None).is_ok());
        assert!(validate_event_text("description", Some("room 4")).is_ok());
        let long = "d".repeat(MAX_EVENT_TEXT_LENGTH + 1);
        let err = validate_event_text("location", Some(&long)).unwrap_err();
        assert!(err.message().starts_with("location"));
    }

    #[test]
    fn window_must_not_be_inverted() {
        let now = Utc::now();
        assert!(validate_event_window(Some(now), Some(now + Duration::hours(1))).is_ok());
        assert!(validate_event_window(Some(now), None).is_ok());
        assert!(validate_event_window(None, None).is_ok());
        assert_matches!(
            validate_event_window(Some(now), Some(now - Duration::minutes(5))),
            Err(CoreError::Validation(_))
        );
    }
}
