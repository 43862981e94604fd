//! User status labels and account field validation.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Default status: the user has not yet met the weekly minimum.
pub const STATUS_NORMAL: &str = "normal";
/// The user has reached the weekly check-in minimum in the current period.
pub const STATUS_ON_TRACK: &str = "on_track";

/// All valid user statuses.
pub const VALID_STATUSES: &[&str] = &[STATUS_NORMAL, STATUS_ON_TRACK];

// ---------------------------------------------------------------------------
// Validation constants
// ---------------------------------------------------------------------------

/// Minimum username length (characters).
pub const MIN_USERNAME_LENGTH: usize = 3;
/// Maximum username length (characters).
pub const MAX_USERNAME_LENGTH: usize = 32;
/// Minimum password length (characters).
pub const MIN_PASSWORD_LENGTH: usize = 8;
/// Maximum password length (characters). Guards the hasher against
/// pathological inputs.
pub const MAX_PASSWORD_LENGTH: usize = 128;

// ---------------------------------------------------------------------------
// Status derivation
// ---------------------------------------------------------------------------

/// The status label for a user with `count` check-ins in the current period.
pub fn status_for_count(count: i32, min_training_days: i32) -> &'static str {
    if count >= min_training_days {
        STATUS_ON_TRACK
    } else {
        STATUS_NORMAL
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a username: length bounds plus a restricted character set.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    let length = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&length) {
        return Err(CoreError::Validation(format!(
            "Username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters (got {length})"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(CoreError::Validation(
            "Username may only contain letters, digits, '_', '-' and '.'".to_string(),
        ));
    }
    Ok(())
}

/// Validate a plaintext password before hashing.
pub fn validate_password(password: &str) -> Result<(), CoreError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    if length > MAX_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}
