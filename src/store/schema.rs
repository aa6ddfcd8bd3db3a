use rusqlite::Connection;

/// Tables for the two reference sets, the purchase ledger and the leaderboard.
pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS store_emissions (
    name                 TEXT PRIMARY KEY,
    co2_emissions        REAL NOT NULL,
    revenue              REAL NOT NULL,
    emissions_intensity  REAL NOT NULL,
    sustainability_score REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS brand_emissions (
    name                 TEXT PRIMARY KEY,
    co2_emissions        REAL NOT NULL,
    revenue              REAL NOT NULL,
    emissions_intensity  REAL NOT NULL,
    sustainability_score REAL NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS purchases (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    source_key   TEXT NOT NULL UNIQUE,
    user_id      TEXT NOT NULL,
    store        TEXT NOT NULL,
    brand        TEXT NOT NULL,
    product_name TEXT NOT NULL,
    quantity     REAL NOT NULL DEFAULT 1,
    unit_price   REAL NOT NULL DEFAULT 0,
    total_price  REAL NOT NULL DEFAULT 0,
    timestamp    TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_purchases_user ON purchases(user_id);

CREATE TABLE IF NOT EXISTS leaderboard (
    user_id     TEXT PRIMARY KEY,
    total_score REAL NOT NULL
);
"#;

pub(crate) fn init_schema_impl(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(DDL)
}
