use serde::{Deserialize, Serialize};

/// Assumed upper bound on a user's raw total score.
pub const DEFAULT_MAX_POSSIBLE_SCORE: f64 = 200.0;

/// Number of lowest-scoring line-items kept per user.
pub const DEFAULT_HARMFUL_LIMIT: usize = 5;

/// Tie handling when rounding scaled scores to two decimals.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go to the even neighbour (0.125 -> 0.12).
    #[default]
    HalfEven,
    /// Ties go toward positive infinity (0.125 -> 0.13, -0.125 -> -0.12).
    HalfUp,
}

/// Scoring configuration.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   max_possible_score: 200
///   harmful_limit: 5
///   rounding: half_even
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Raw score that maps to 100 on the scaled leaderboard (default: 200)
    #[serde(default = "default_max_possible_score")]
    pub max_possible_score: f64,

    /// How many harmful products to keep per user (default: 5)
    #[serde(default = "default_harmful_limit")]
    pub harmful_limit: usize,

    #[serde(default)]
    pub rounding: RoundingMode,
}

fn default_max_possible_score() -> f64 {
    DEFAULT_MAX_POSSIBLE_SCORE
}

fn default_harmful_limit() -> usize {
    DEFAULT_HARMFUL_LIMIT
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            max_possible_score: DEFAULT_MAX_POSSIBLE_SCORE,
            harmful_limit: DEFAULT_HARMFUL_LIMIT,
            rounding: RoundingMode::HalfEven,
        }
    }
}
