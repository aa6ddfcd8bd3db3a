use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the library.
///
/// Unknown store or brand names are never an error; they contribute 0 to a
/// score. Per-record ingestion problems are skipped and counted in an
/// [`IngestReport`](crate::ingest::IngestReport) rather than returned here.
#[derive(Debug, Error)]
pub enum EcoError {
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("ingestion format error in {source_name}: {message}")]
    IngestionFormat {
        source_name: String,
        message: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EcoError {
    pub fn ingestion(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        EcoError::IngestionFormat {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    /// True for failures of the relational store itself.
    pub fn is_storage(&self) -> bool {
        matches!(self, EcoError::StorageUnavailable { .. } | EcoError::Storage(_))
    }
}

pub type Result<T> = std::result::Result<T, EcoError>;
