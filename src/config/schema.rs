use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scoring::ScoringConfig;

pub const DEFAULT_DATABASE: &str = "sustainability.db";

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQLite database file (default: sustainability.db in the working directory)
    #[serde(default = "default_database")]
    pub database: PathBuf,

    #[serde(default)]
    pub scoring: ScoringConfig,

    #[serde(default)]
    pub sources: SourcesConfig,

    #[serde(default)]
    pub export: Option<ExportConfig>,
}

fn default_database() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            scoring: ScoringConfig::default(),
            sources: SourcesConfig::default(),
            export: None,
        }
    }
}

/// Input files for `eco-score run`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    pub stores: Option<PathBuf>,
    pub brands: Option<PathBuf>,
    pub purchases: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ExportConfig {
    pub path: PathBuf,
    /// User whose harmful products are included in the export
    pub user: Option<String>,
}
