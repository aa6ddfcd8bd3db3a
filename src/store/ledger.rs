use rusqlite::{params, Connection};

use crate::model::{NewPurchase, PurchaseRecord};

const PURCHASE_COLUMNS: &str =
    "id, user_id, store, brand, product_name, quantity, unit_price, total_price, timestamp";

fn row_to_purchase(row: &rusqlite::Row<'_>) -> rusqlite::Result<PurchaseRecord> {
    Ok(PurchaseRecord {
        id: row.get(0)?,
        user_id: row.get(1)?,
        store: row.get(2)?,
        brand: row.get(3)?,
        product_name: row.get(4)?,
        quantity: row.get(5)?,
        unit_price: row.get(6)?,
        total_price: row.get(7)?,
        timestamp: row.get(8)?,
    })
}

/// Append line-items, ignoring any whose `source_key` is already present.
/// Returns how many rows were actually inserted.
pub(crate) fn insert_purchases_impl(
    conn: &Connection,
    purchases: &[NewPurchase],
) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO purchases
            (source_key, user_id, store, brand, product_name, quantity, unit_price, total_price, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    let mut inserted = 0;
    for p in purchases {
        inserted += stmt.execute(params![
            p.source_key,
            p.user_id,
            p.store,
            p.brand,
            p.product_name,
            p.quantity,
            p.unit_price,
            p.total_price,
            p.timestamp,
        ])?;
    }
    Ok(inserted)
}

/// Every line-item in ledger order.
pub(crate) fn fetch_purchases_impl(conn: &Connection) -> rusqlite::Result<Vec<PurchaseRecord>> {
    let sql = format!("SELECT {} FROM purchases ORDER BY id", PURCHASE_COLUMNS);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], row_to_purchase)?;

    let mut purchases = Vec::new();
    for r in rows {
        purchases.push(r?);
    }
    Ok(purchases)
}

pub(crate) fn fetch_user_purchases_impl(
    conn: &Connection,
    user_id: &str,
) -> rusqlite::Result<Vec<PurchaseRecord>> {
    let sql = format!(
        "SELECT {} FROM purchases WHERE user_id = ?1 ORDER BY id",
        PURCHASE_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], row_to_purchase)?;

    let mut purchases = Vec::new();
    for r in rows {
        purchases.push(r?);
    }
    Ok(purchases)
}
