use std::collections::HashMap;

use rusqlite::{params, Connection, OptionalExtension};

use crate::model::{EmissionsEntry, ReferenceTable};
use crate::scoring::ReferenceScores;

/// Insert or replace rows by name. Returns the number of rows written.
pub(crate) fn upsert_emissions_impl(
    conn: &Connection,
    table: ReferenceTable,
    entries: &[EmissionsEntry],
) -> rusqlite::Result<usize> {
    let sql = format!(
        "INSERT INTO {}(name, co2_emissions, revenue, emissions_intensity, sustainability_score)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(name) DO UPDATE SET
             co2_emissions = excluded.co2_emissions,
             revenue = excluded.revenue,
             emissions_intensity = excluded.emissions_intensity,
             sustainability_score = excluded.sustainability_score",
        table.table_name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mut written = 0;
    for entry in entries {
        written += stmt.execute(params![
            entry.name,
            entry.co2_emissions,
            entry.revenue,
            entry.emissions_intensity,
            entry.sustainability_score,
        ])?;
    }
    Ok(written)
}

/// `sustainability_score` for an exact name match, 0 when absent.
pub(crate) fn sustainability_score_impl(
    conn: &Connection,
    table: ReferenceTable,
    name: &str,
) -> rusqlite::Result<f64> {
    let sql = format!(
        "SELECT sustainability_score FROM {} WHERE name = ?1",
        table.table_name()
    );
    let score: Option<f64> = conn
        .query_row(&sql, params![name], |row| row.get(0))
        .optional()?;
    Ok(score.unwrap_or(0.0))
}

pub(crate) fn fetch_emissions_impl(
    conn: &Connection,
    table: ReferenceTable,
) -> rusqlite::Result<Vec<EmissionsEntry>> {
    let sql = format!(
        "SELECT name, co2_emissions, revenue, emissions_intensity, sustainability_score
         FROM {} ORDER BY name",
        table.table_name()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| {
        Ok(EmissionsEntry {
            name: row.get(0)?,
            co2_emissions: row.get(1)?,
            revenue: row.get(2)?,
            emissions_intensity: row.get(3)?,
            sustainability_score: row.get(4)?,
        })
    })?;

    let mut entries = Vec::new();
    for r in rows {
        entries.push(r?);
    }
    Ok(entries)
}

fn score_map_impl(conn: &Connection, table: ReferenceTable) -> rusqlite::Result<HashMap<String, f64>> {
    let sql = format!("SELECT name, sustainability_score FROM {}", table.table_name());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)))?;

    let mut map = HashMap::new();
    for r in rows {
        let (name, score) = r?;
        map.insert(name, score);
    }
    Ok(map)
}

/// Bulk-load both reference tables into memory.
pub(crate) fn load_reference_scores_impl(conn: &Connection) -> rusqlite::Result<ReferenceScores> {
    let stores = score_map_impl(conn, ReferenceTable::Store)?;
    let brands = score_map_impl(conn, ReferenceTable::Brand)?;
    Ok(ReferenceScores::new(stores, brands))
}
