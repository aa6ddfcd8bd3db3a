use serde::{Deserialize, Serialize};
use std::fmt;

/// One purchased line-item in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Ledger sequence number; ascending in insertion order.
    pub id: i64,
    pub user_id: String,
    pub store: String,
    pub brand: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
    pub timestamp: String,
}

/// A purchase line-item before it has been written to the ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    /// Stable identity of the line-item in its source feed, used to ignore
    /// re-imports of the same record.
    pub source_key: String,
    pub user_id: String,
    pub store: String,
    pub brand: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
    pub timestamp: String,
}

/// A row of the store or brand emissions table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionsEntry {
    pub name: String,
    pub co2_emissions: f64,
    pub revenue: f64,
    pub emissions_intensity: f64,
    pub sustainability_score: f64,
}

/// Which reference table a name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceTable {
    Store,
    Brand,
}

impl ReferenceTable {
    pub fn table_name(self) -> &'static str {
        match self {
            ReferenceTable::Store => "store_emissions",
            ReferenceTable::Brand => "brand_emissions",
        }
    }
}

impl fmt::Display for ReferenceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceTable::Store => write!(f, "store"),
            ReferenceTable::Brand => write!(f, "brand"),
        }
    }
}

/// Per-user aggregate produced by a scoring run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserScore {
    pub user_id: String,
    /// Unscaled sum of combined scores.
    pub total_score: f64,
    /// `total_score` rescaled against the configured maximum; not clamped.
    pub scaled_score: f64,
}

/// A purchase line-item ranked by how little it contributes to a user's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmfulProduct {
    pub product_name: String,
    pub store: String,
    pub brand: String,
    pub score: f64,
    pub store_score: f64,
    pub brand_score: f64,
}

/// Persisted leaderboard entry. `score` is the scaled score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub user_id: String,
    pub score: f64,
}
