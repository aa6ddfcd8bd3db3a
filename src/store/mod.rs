//! SQLite-backed storage for reference tables, the purchase ledger and the
//! leaderboard.
//!
//! A [`Store`] owns one connection. Open it for the duration of a command and
//! drop it when done; nothing holds a connection globally.

mod leaderboard;
mod ledger;
mod reference;
pub mod schema;

use std::path::Path;

use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info};

use crate::error::{EcoError, Result};
use crate::model::{
    EmissionsEntry, HarmfulProduct, LeaderboardRow, NewPurchase, PurchaseRecord, ReferenceTable,
};
use crate::scoring::{compute_scores, rank_harmful, ReferenceScores, ScoreRun, ScoringConfig};

pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| EcoError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened database");
        Ok(Self { conn })
    }

    pub fn memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Create any missing tables. Safe to call on every open.
    pub fn init_schema(&self) -> Result<()> {
        schema::init_schema_impl(&self.conn)?;
        Ok(())
    }

    /// Upsert reference rows by name in a single transaction.
    pub fn upsert_emissions(
        &mut self,
        table: ReferenceTable,
        entries: &[EmissionsEntry],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let written = reference::upsert_emissions_impl(&tx, table, entries)?;
        tx.commit()?;
        Ok(written)
    }

    pub fn emissions(&self, table: ReferenceTable) -> Result<Vec<EmissionsEntry>> {
        Ok(reference::fetch_emissions_impl(&self.conn, table)?)
    }

    /// Score for an exact `name` match in `table`; 0 when there is none.
    pub fn sustainability_score(&self, table: ReferenceTable, name: &str) -> Result<f64> {
        Ok(reference::sustainability_score_impl(&self.conn, table, name)?)
    }

    pub fn reference_scores(&self) -> Result<ReferenceScores> {
        Ok(reference::load_reference_scores_impl(&self.conn)?)
    }

    /// Append line-items in a single transaction. Items already imported
    /// (same `source_key`) are ignored; the count excludes them.
    pub fn insert_purchases(&mut self, purchases: &[NewPurchase]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let inserted = ledger::insert_purchases_impl(&tx, purchases)?;
        tx.commit()?;
        Ok(inserted)
    }

    pub fn purchases(&self) -> Result<Vec<PurchaseRecord>> {
        Ok(ledger::fetch_purchases_impl(&self.conn)?)
    }

    pub fn user_purchases(&self, user_id: &str) -> Result<Vec<PurchaseRecord>> {
        Ok(ledger::fetch_user_purchases_impl(&self.conn, user_id)?)
    }

    pub fn leaderboard(&self) -> Result<Vec<LeaderboardRow>> {
        Ok(leaderboard::fetch_leaderboard_impl(&self.conn)?)
    }

    /// Recompute every user's score and upsert the leaderboard.
    ///
    /// Runs inside one immediate transaction: the reference tables and ledger
    /// cannot change underneath the run, and on any error nothing is written.
    pub fn run_scoring(&mut self, config: &ScoringConfig) -> Result<ScoreRun> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let refs = reference::load_reference_scores_impl(&tx)?;
        let purchases = ledger::fetch_purchases_impl(&tx)?;
        debug!(
            stores = refs.len(ReferenceTable::Store),
            brands = refs.len(ReferenceTable::Brand),
            purchases = purchases.len(),
            "loaded scoring inputs"
        );

        let run = compute_scores(&purchases, &refs, config);
        let written = leaderboard::upsert_leaderboard_impl(&tx, &run.users)?;
        tx.commit()?;

        info!(
            users = run.users.len(),
            purchases = run.purchases_scored,
            rows = written,
            "leaderboard updated"
        );
        Ok(run)
    }

    /// Lowest-scoring line-items for one user, using the current reference
    /// tables. Empty for a user with no purchases.
    pub fn harmful_products(
        &self,
        user_id: &str,
        config: &ScoringConfig,
    ) -> Result<Vec<HarmfulProduct>> {
        let refs = self.reference_scores()?;
        let purchases = self.user_purchases(user_id)?;
        Ok(rank_harmful(&purchases, &refs, config.harmful_limit))
    }
}
