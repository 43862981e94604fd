//! Point formulas for weekly consistency and challenge scoring.

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default minimum check-ins per week to earn any points.
pub const DEFAULT_MIN_TRAINING_DAYS: i32 = 3;

/// Default flat per-check-in multiplier for challenges without custom rules.
pub const DEFAULT_CHALLENGE_RATE: i32 = 5;

/// Points awarded for exactly meeting the weekly minimum.
pub const WEEKLY_BASE_POINTS: i32 = 10;

/// Points awarded per check-in beyond the weekly minimum.
pub const WEEKLY_EXTRA_POINTS: i32 = 3;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Scoring thresholds, loaded once at startup and shared by the whole engine.
#[derive(Debug, Clone, Copy)]
pub struct ScoringConfig {
    /// Minimum check-ins in a period before weekly points are earned.
    pub min_training_days: i32,
    /// Per-check-in multiplier for challenges that define no custom rules.
    pub default_challenge_rate: i32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            min_training_days: DEFAULT_MIN_TRAINING_DAYS,
            default_challenge_rate: DEFAULT_CHALLENGE_RATE,
        }
    }
}

/// Custom scoring rules for one challenge.
///
/// `additional_unit <= 0` disables the additional tier entirely: meeting the
/// threshold earns `min_points` flat, with no division performed.
#[derive(Debug, Clone, Copy)]
pub struct ChallengeScoring {
    pub min_threshold: i32,
    pub min_points: i32,
    pub additional_unit: i32,
    pub additional_points: i32,
}

// ---------------------------------------------------------------------------
// Formulas
// ---------------------------------------------------------------------------

/// Weekly points for `count` check-ins in one period.
///
/// Zero below the minimum; at the minimum the score jumps to
/// [`WEEKLY_BASE_POINTS`] and grows by [`WEEKLY_EXTRA_POINTS`] per additional
/// check-in.
pub fn weekly_points(count: i32, min_training_days: i32) -> i32 {
    if count < min_training_days {
        0
    } else {
        WEEKLY_BASE_POINTS + WEEKLY_EXTRA_POINTS * (count - min_training_days)
    }
}

/// Challenge points for `count` check-ins in one period.
///
/// Without rules, every check-in is worth `default_rate` points. With rules,
/// the score is zero below `min_threshold`, then `min_points` plus one
/// `additional_points` bonus per whole `additional_unit` check-ins above the
/// threshold.
pub fn challenge_points(count: i32, rules: Option<&ChallengeScoring>, default_rate: i32) -> i32 {
    let Some(rules) = rules else {
        return count * default_rate;
    };

    if count < rules.min_threshold {
        return 0;
    }

    let mut points = rules.min_points;
    if rules.additional_unit > 0 {
        let extra = count - rules.min_threshold;
        points += (extra / rules.additional_unit) * rules.additional_points;
    }
    points
}
