//! Loading reference tables and transaction feeds into the store.

mod fields;
pub mod purchases;
pub mod reference;
pub mod report;

pub use purchases::parse_feed;
pub use reference::parse_emissions;
pub use report::{IngestReport, SkippedRecord};

use std::fs;
use std::path::Path;

use chrono::Utc;
use tracing::info;

use crate::error::{EcoError, Result};
use crate::model::ReferenceTable;
use crate::store::Store;

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| EcoError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load a store or brand emissions file and upsert it by name.
pub fn import_emissions(store: &mut Store, table: ReferenceTable, path: &Path) -> Result<IngestReport> {
    let content = read_source(path)?;
    let (entries, mut report) = parse_emissions(&source_name(path), &content)?;
    report.written = store.upsert_emissions(table, &entries)?;
    info!(
        table = %table,
        accepted = report.accepted,
        written = report.written,
        skipped = report.skipped_count(),
        "imported emissions"
    );
    Ok(report)
}

/// Load a transaction feed into the ledger. Line-items already present from
/// an earlier import of the same feed are left alone.
pub fn import_purchases(store: &mut Store, path: &Path) -> Result<IngestReport> {
    let content = read_source(path)?;
    let (purchases, mut report) = parse_feed(&source_name(path), &content, Utc::now())?;
    report.written = store.insert_purchases(&purchases)?;
    info!(
        accepted = report.accepted,
        written = report.written,
        skipped = report.skipped_count(),
        "imported purchases"
    );
    Ok(report)
}
