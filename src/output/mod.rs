pub mod export;
pub mod formatter;

pub use export::{write_export, LeaderboardExport};
pub use formatter::{
    format_harmful_table, format_harmful_tsv, format_ingest_summary, format_leaderboard_table,
    format_leaderboard_tsv, format_score, should_use_colors,
};
