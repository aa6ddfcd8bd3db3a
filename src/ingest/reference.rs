use serde_json::Value;

use super::fields::{field, number, text};
use super::report::IngestReport;
use crate::error::{EcoError, Result};
use crate::model::EmissionsEntry;

const NAME_KEYS: &[&str] = &["name", "Name", "Store", "Brand", "store", "brand"];
const CO2_KEYS: &[&str] = &["co2_emissions", "Co2 emissions", "CO2 emissions"];
const REVENUE_KEYS: &[&str] = &["revenue", "Revenue"];
const INTENSITY_KEYS: &[&str] = &["emissions_intensity", "Emissions Intensity"];
const SCORE_KEYS: &[&str] = &["sustainability_score", "Sustainability Score"];

/// Parse an emissions table exported as a JSON array of row objects.
///
/// `name`, `co2_emissions`, `revenue` and `emissions_intensity` must be
/// present and non-null; rows missing one are skipped and recorded in the
/// report. `sustainability_score` defaults to 0.
pub fn parse_emissions(source: &str, content: &str) -> Result<(Vec<EmissionsEntry>, IngestReport)> {
    let doc: Value = serde_json::from_str(content)
        .map_err(|e| EcoError::ingestion(source, format!("invalid JSON: {}", e)))?;
    let rows = doc
        .as_array()
        .ok_or_else(|| EcoError::ingestion(source, "expected a JSON array of rows"))?;

    let mut report = IngestReport::new(source);
    let mut entries = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let location = format!("row {}", i + 1);
        match parse_row(row) {
            Ok(entry) => entries.push(entry),
            Err(reason) => report.skip(location, reason),
        }
    }

    report.accepted = entries.len();
    Ok((entries, report))
}

fn parse_row(row: &Value) -> std::result::Result<EmissionsEntry, String> {
    let obj = row.as_object().ok_or("row is not an object")?;

    let name = text(field(obj, NAME_KEYS))?
        .filter(|n| !n.trim().is_empty())
        .ok_or("missing name")?;
    let required = |keys: &[&str], label: &str| -> std::result::Result<f64, String> {
        number(field(obj, keys))
            .map_err(|e| format!("{}: {}", label, e))?
            .ok_or_else(|| format!("missing {}", label))
    };

    Ok(EmissionsEntry {
        co2_emissions: required(CO2_KEYS, "co2_emissions")?,
        revenue: required(REVENUE_KEYS, "revenue")?,
        emissions_intensity: required(INTENSITY_KEYS, "emissions_intensity")?,
        sustainability_score: number(field(obj, SCORE_KEYS))
            .map_err(|e| format!("sustainability_score: {}", e))?
            .unwrap_or(0.0),
        name,
    })
}
