//! Challenge invariants: invite codes, window arithmetic, and field
//! validation shared by the API and repository layers.

use chrono::Duration;
use rand::Rng;

use crate::error::CoreError;
use crate::scoring::ChallengeScoring;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Length of the generated invite code (alphanumeric characters).
pub const CODE_LENGTH: usize = 8;

/// Maximum length for the challenge title (characters).
pub const MAX_TITLE_LENGTH: usize = 120;

/// Maximum length for the modality label (characters).
pub const MAX_MODALITY_LENGTH: usize = 60;

/// Maximum challenge duration in days.
pub const MAX_DURATION_DAYS: i32 = 365;

// ---------------------------------------------------------------------------
// Invite codes
// ---------------------------------------------------------------------------

/// Generate a random invite code for a new challenge.
///
/// Uniqueness is enforced by the database; on the (unlikely) collision the
/// caller regenerates and retries.
pub fn generate_invite_code() -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(CODE_LENGTH)
        .map(char::from)
        .collect()
}

// ---------------------------------------------------------------------------
// Window arithmetic
// ---------------------------------------------------------------------------

/// The end instant of a challenge starting at `start` and running for
/// `duration_days` days.
pub fn derive_end_date(start: Timestamp, duration_days: i32) -> Timestamp {
    start + Duration::days(i64::from(duration_days))
}

/// Challenges are editable only before their window opens.
pub fn ensure_not_started(start_date: Timestamp, now: Timestamp) -> Result<(), CoreError> {
    if now >= start_date {
        return Err(CoreError::InvalidState(
            "Challenge has already started and can no longer be modified".to_string(),
        ));
    }
    Ok(())
}

/// A challenge check-in must fall inside the challenge window, boundaries
/// included.
pub fn ensure_in_window(
    start_date: Timestamp,
    end_date: Timestamp,
    ts: Timestamp,
) -> Result<(), CoreError> {
    if ts < start_date || ts > end_date {
        return Err(CoreError::InvalidState(format!(
            "Check-in timestamp {ts} is outside the challenge window"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate the challenge title: non-blank, bounded length.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the modality label: non-blank, bounded length.
pub fn validate_modality(modality: &str) -> Result<(), CoreError> {
    if modality.trim().is_empty() {
        return Err(CoreError::Validation(
            "Modality must not be empty".to_string(),
        ));
    }
    if modality.chars().count() > MAX_MODALITY_LENGTH {
        return Err(CoreError::Validation(format!(
            "Modality exceeds maximum length of {MAX_MODALITY_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate the challenge target (total check-ins, km, etc.).
pub fn validate_target(target: i32) -> Result<(), CoreError> {
    if target <= 0 {
        return Err(CoreError::Validation(
            "Target must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Validate the challenge duration in days.
pub fn validate_duration_days(duration_days: i32) -> Result<(), CoreError> {
    if !(1..=MAX_DURATION_DAYS).contains(&duration_days) {
        return Err(CoreError::Validation(format!(
            "Duration must be between 1 and {MAX_DURATION_DAYS} days (got {duration_days})"
        )));
    }
    Ok(())
}

/// Validate a custom scoring rule tuple. `additional_unit` may be zero
/// (disables the additional tier) but never negative.
pub fn validate_rules(rules: &ChallengeScoring) -> Result<(), CoreError> {
    if rules.min_threshold < 0 {
        return Err(CoreError::Validation(
            "Rule min_threshold must not be negative".to_string(),
        ));
    }
    if rules.min_points < 0 {
        return Err(CoreError::Validation(
            "Rule min_points must not be negative".to_string(),
        ));
    }
    if rules.additional_unit < 0 {
        return Err(CoreError::Validation(
            "Rule additional_unit must not be negative".to_string(),
        ));
    }
    if rules.additional_points < 0 {
        return Err(CoreError::Validation(
            "Rule additional_points must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(y: i32, mo: u32, d: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn invite_codes_have_fixed_length_and_charset() {
        for _ in 0..20 {
            let code = generate_invite_code();
            assert_eq!(code.len(), CODE_LENGTH);
            assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }

    #[test]
    fn end_date_is_start_plus_duration() {
        let start = ts(2025, 3, 1);
        assert_eq!(derive_end_date(start, 30), ts(2025, 3, 31));
    }

    #[test]
    fn editing_before_start_is_allowed() {
        assert!(ensure_not_started(ts(2025, 5, 1), ts(2025, 4, 30)).is_ok());
    }

    #[test]
    fn editing_at_or_after_start_is_rejected() {
        assert!(ensure_not_started(ts(2025, 5, 1), ts(2025, 5, 1)).is_err());
        assert!(ensure_not_started(ts(2025, 5, 1), ts(2025, 5, 2)).is_err());
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let start = ts(2025, 5, 1);
        let end = derive_end_date(start, 10);
        assert!(ensure_in_window(start, end, start).is_ok());
        assert!(ensure_in_window(start, end, end).is_ok());
        assert!(ensure_in_window(start, end, ts(2025, 5, 5)).is_ok());
        assert!(ensure_in_window(start, end, ts(2025, 4, 30)).is_err());
        assert!(ensure_in_window(start, end, ts(2025, 5, 12)).is_err());
    }

    #[test]
    fn blank_title_and_modality_are_rejected() {
        assert!(validate_title("  ").is_err());
        assert!(validate_title("March running streak").is_ok());
        assert!(validate_modality("").is_err());
        assert!(validate_modality("running").is_ok());
    }

    #[test]
    fn target_and_duration_bounds() {
        assert!(validate_target(0).is_err());
        assert!(validate_target(18).is_ok());
        assert!(validate_duration_days(0).is_err());
        assert!(validate_duration_days(MAX_DURATION_DAYS + 1).is_err());
        assert!(validate_duration_days(30).is_ok());
    }

    #[test]
    fn negative_rule_fields_are_rejected() {
        let good = ChallengeScoring {
            min_threshold: 3,
            min_points: 10,
            additional_unit: 0,
            additional_points: 0,
        };
        assert!(validate_rules(&good).is_ok());
        assert!(validate_rules(&ChallengeScoring {
            min_threshold: -1,
            ..good
        })
        .is_err());
        assert!(validate_rules(&ChallengeScoring {
            additional_unit: -2,
            ..good
        })
        .is_err());
    }
}
