use std::fmt;

use serde::Serialize;
use tracing::warn;

/// A record dropped during ingestion and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    /// Where in the source the record sits, e.g. `row 3` or
    /// `transactions[2].products[0]`.
    pub location: String,
    pub reason: String,
}

/// Outcome of loading one source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    pub source: String,
    /// Records that parsed cleanly.
    pub accepted: usize,
    /// Rows actually written; lower than `accepted` when a re-import hits
    /// records that are already stored.
    pub written: usize,
    pub skipped: Vec<SkippedRecord>,
}

impl IngestReport {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Record and log a dropped record.
    pub fn skip(&mut self, location: impl Into<String>, reason: impl Into<String>) {
        let record = SkippedRecord {
            location: location.into(),
            reason: reason.into(),
        };
        warn!(
            source = %self.source,
            location = %record.location,
            reason = %record.reason,
            "skipping malformed record"
        );
        self.skipped.push(record);
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} accepted, {} written, {} skipped",
            self.source,
            self.accepted,
            self.written,
            self.skipped.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_collects_records() {
        let mut report = IngestReport::new("stores.json");
        report.skip("row 2", "missing name");
        report.skip("row 5", "revenue is not a number");
        assert_eq!(report.skipped_count(), 2);
        assert_eq!(report.skipped[1].location, "row 5");
    }

    #[test]
    fn test_display_summary() {
        let mut report = IngestReport::new("feed.json");
        report.accepted = 4;
        report.written = 3;
        report.skip("transactions[0].products[1]", "missing name");
        assert_eq!(
            report.to_string(),
            "feed.json: 4 accepted, 3 written, 1 skipped"
        );
    }
}
