pub mod config;
pub mod engine;
pub mod harmful;
pub mod lookup;
pub mod normalize;
pub mod validation;

pub use config::*;
pub use engine::{compute_scores, sort_leaderboard, total_score, ScoreRun};
pub use harmful::rank_harmful;
pub use lookup::ReferenceScores;
pub use normalize::{round_to_cents, scale_score};
pub use validation::validate_scoring;
