use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::fields::{field, number, text};
use super::report::IngestReport;
use crate::error::{EcoError, Result};
use crate::model::NewPurchase;

pub const DEFAULT_USER: &str = "test_user";
pub const UNKNOWN: &str = "Unknown";

/// Transaction feed. Either one merchant export, or exports grouped per user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Feed {
    Nested { users: Vec<FeedUser> },
    Single(FeedExample),
}

#[derive(Debug, Deserialize)]
struct FeedUser {
    user_id: String,
    #[serde(default)]
    examples: Vec<FeedExample>,
}

#[derive(Debug, Deserialize)]
struct FeedExample {
    #[serde(default)]
    merchant: Option<Merchant>,
    #[serde(default)]
    transactions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Merchant {
    #[serde(default)]
    name: Option<String>,
}

/// Flatten a transaction feed into ledger line-items.
///
/// Missing brand becomes `"Unknown"`, missing quantity 1, missing prices 0
/// and a missing timestamp `now`. A product without a name or with a
/// non-numeric quantity or price is skipped and recorded in the report.
pub fn parse_feed(
    source: &str,
    content: &str,
    now: DateTime<Utc>,
) -> Result<(Vec<NewPurchase>, IngestReport)> {
    let feed: Feed = serde_json::from_str(content)
        .map_err(|e| EcoError::ingestion(source, format!("unrecognised transaction feed: {}", e)))?;

    let mut report = IngestReport::new(source);
    let mut purchases = Vec::new();
    let now = now.to_rfc3339_opts(SecondsFormat::Secs, true);

    match feed {
        Feed::Single(example) => {
            parse_example(&example, None, 0, "", &now, &mut purchases, &mut report);
        }
        Feed::Nested { users } => {
            for (u, user) in users.iter().enumerate() {
                for (e, example) in user.examples.iter().enumerate() {
                    let prefix = format!("users[{}].examples[{}].", u, e);
                    parse_example(
                        example,
                        Some(&user.user_id),
                        e,
                        &prefix,
                        &now,
                        &mut purchases,
                        &mut report,
                    );
                }
            }
        }
    }

    report.accepted = purchases.len();
    Ok((purchases, report))
}

fn parse_example(
    example: &FeedExample,
    user_id: Option<&str>,
    example_index: usize,
    prefix: &str,
    now: &str,
    purchases: &mut Vec<NewPurchase>,
    report: &mut IngestReport,
) {
    let store = example
        .merchant
        .as_ref()
        .and_then(|m| m.name.clone())
        .unwrap_or_else(|| UNKNOWN.to_string());

    for (t, txn) in example.transactions.iter().enumerate() {
        let location = format!("{}transactions[{}]", prefix, t);
        let Some(obj) = txn.as_object() else {
            report.skip(location, "transaction is not an object");
            continue;
        };

        let header = (|| -> std::result::Result<(String, Value, String), String> {
            let user = match user_id {
                Some(u) => u.to_string(),
                None => text(field(obj, &["external_id"]))?
                    .unwrap_or_else(|| DEFAULT_USER.to_string()),
            };
            let txn_key = match text(field(obj, &["id"]))? {
                Some(id) => Value::String(id),
                None => Value::from(t),
            };
            let timestamp = text(field(obj, &["datetime"]))?.unwrap_or_else(|| now.to_string());
            Ok((user, txn_key, timestamp))
        })();
        let (user, txn_key, timestamp) = match header {
            Ok(h) => h,
            Err(reason) => {
                report.skip(location, reason);
                continue;
            }
        };

        let Some(products) = obj.get("products").and_then(Value::as_array) else {
            report.skip(location, "missing products list");
            continue;
        };

        for (p, product) in products.iter().enumerate() {
            match parse_product(product) {
                Ok(line) => purchases.push(NewPurchase {
                    source_key: line_key(&user, &store, example_index, &txn_key, p),
                    user_id: user.clone(),
                    store: store.clone(),
                    brand: line.brand,
                    product_name: line.name,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                    total_price: line.total_price,
                    timestamp: timestamp.clone(),
                }),
                Err(reason) => report.skip(format!("{}.products[{}]", location, p), reason),
            }
        }
    }
}

/// Identity of one line-item within a feed: user, merchant, example,
/// transaction and line position. Encoded as a JSON array so no component
/// can bleed into its neighbour. A transaction without an id is keyed by its
/// position, as a number, so it never matches a string id.
fn line_key(user: &str, store: &str, example_index: usize, txn_key: &Value, line: usize) -> String {
    serde_json::json!([user, store, example_index, txn_key, line]).to_string()
}

struct ProductLine {
    name: String,
    brand: String,
    quantity: f64,
    unit_price: f64,
    total_price: f64,
}

fn parse_product(product: &Value) -> std::result::Result<ProductLine, String> {
    let obj = product.as_object().ok_or("product is not an object")?;

    let name = text(field(obj, &["name"]))?.ok_or("missing name")?;
    let brand = text(field(obj, &["brand"]))?.unwrap_or_else(|| UNKNOWN.to_string());
    let quantity = number(field(obj, &["quantity"]))
        .map_err(|e| format!("quantity: {}", e))?
        .unwrap_or(1.0);

    let (unit_price, total_price) = match field(obj, &["price"]) {
        None => (0.0, 0.0),
        Some(Value::Object(price)) => (
            number(field(price, &["unit_price"]))
                .map_err(|e| format!("unit_price: {}", e))?
                .unwrap_or(0.0),
            number(field(price, &["total"]))
                .map_err(|e| format!("total: {}", e))?
                .unwrap_or(0.0),
        ),
        Some(other) => return Err(format!("price: expected an object, got {}", other)),
    };

    Ok(ProductLine {
        name,
        brand,
        quantity,
        unit_price,
        total_price,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    const SINGLE: &str = r#"{
        "merchant": {"name": "Walmart"},
        "transactions": [
            {
                "id": "txn-1",
                "external_id": "user_001",
                "datetime": "2025-05-30T09:15:00Z",
                "products": [
                    {"name": "Soap", "brand": "Dove", "quantity": 2, "price": {"unit_price": 1.5, "total": 3.0}},
                    {"name": "Bananas"}
                ]
            },
            {
                "products": [
                    {"name": "Soda", "brand": "Coke", "quantity": "3", "price": {"total": "4.50"}}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_single_export() {
        let (purchases, report) = parse_feed("Mock_data.json", SINGLE, now()).unwrap();

        assert_eq!(purchases.len(), 3);
        assert!(report.skipped.is_empty());
        assert_eq!(report.accepted, 3);

        let soap = &purchases[0];
        assert_eq!(soap.user_id, "user_001");
        assert_eq!(soap.store, "Walmart");
        assert_eq!(soap.brand, "Dove");
        assert_eq!(soap.quantity, 2.0);
        assert_eq!(soap.unit_price, 1.5);
        assert_eq!(soap.total_price, 3.0);
        assert_eq!(soap.timestamp, "2025-05-30T09:15:00Z");
        assert_eq!(soap.source_key, r#"["user_001","Walmart",0,"txn-1",0]"#);
    }

    #[test]
    fn test_defaults_applied() {
        let (purchases, _) = parse_feed("Mock_data.json", SINGLE, now()).unwrap();

        let bananas = &purchases[1];
        assert_eq!(bananas.brand, "Unknown");
        assert_eq!(bananas.quantity, 1.0);
        assert_eq!(bananas.unit_price, 0.0);
        assert_eq!(bananas.total_price, 0.0);

        let soda = &purchases[2];
        assert_eq!(soda.user_id, DEFAULT_USER);
        assert_eq!(soda.timestamp, "2025-06-01T12:00:00Z");
        assert_eq!(soda.quantity, 3.0);
        assert_eq!(soda.unit_price, 0.0);
        assert_eq!(soda.total_price, 4.5);
        assert_eq!(soda.source_key, r#"["test_user","Walmart",0,1,0]"#);
    }

    #[test]
    fn test_nested_feed() {
        let content = r#"{
            "users": [
                {"user_id": "alice", "examples": [
                    {"merchant": {"name": "Target"}, "transactions": [
                        {"id": 7, "external_id": "ignored", "products": [{"name": "Gum", "brand": "Trident"}]}
                    ]},
                    {"merchant": {"name": "Costco"}, "transactions": [
                        {"products": [{"name": "Rice"}]}
                    ]}
                ]},
                {"user_id": "bob", "examples": []}
            ]
        }"#;
        let (purchases, report) = parse_feed("feed.json", content, now()).unwrap();

        assert_eq!(purchases.len(), 2);
        assert!(report.skipped.is_empty());
        assert_eq!(purchases[0].user_id, "alice");
        assert_eq!(purchases[0].store, "Target");
        assert_eq!(purchases[0].source_key, r#"["alice","Target",0,"7",0]"#);
        assert_eq!(purchases[1].store, "Costco");
        assert_eq!(purchases[1].source_key, r#"["alice","Costco",1,0,0]"#);
        assert!(purchases.iter().all(|p| p.user_id != "bob"));
    }

    #[test]
    fn test_malformed_products_skipped() {
        let content = r#"{
            "merchant": {"name": "Walmart"},
            "transactions": [
                {"id": "t1", "products": [
                    {"brand": "NoName"},
                    {"name": "Milk", "quantity": "a few"},
                    {"name": "Eggs", "price": 3},
                    {"name": "Bread", "price": {"unit_price": "cheap"}},
                    {"name": "Butter"}
                ]},
                {"id": "t2"},
                42
            ]
        }"#;
        let (purchases, report) = parse_feed("feed.json", content, now()).unwrap();

        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].product_name, "Butter");
        assert_eq!(purchases[0].source_key, r#"["test_user","Walmart",0,"t1",4]"#);
        assert_eq!(report.skipped_count(), 6);
        assert_eq!(report.skipped[0].location, "transactions[0].products[0]");
        assert!(report.skipped[1].reason.contains("quantity"));
        assert_eq!(report.skipped[4].location, "transactions[1]");
    }

    #[test]
    fn test_missing_merchant_defaults_unknown() {
        let content = r#"{"transactions": [{"id": "t", "products": [{"name": "Tea"}]}]}"#;
        let (purchases, _) = parse_feed("feed.json", content, now()).unwrap();
        assert_eq!(purchases[0].store, "Unknown");
    }

    #[test]
    fn test_unparseable_feed_is_fatal() {
        assert!(matches!(
            parse_feed("feed.json", "[1, 2, 3]", now()),
            Err(EcoError::IngestionFormat { .. })
        ));
        assert!(parse_feed("feed.json", "not json", now()).is_err());
    }

    #[test]
    fn test_reparse_yields_same_keys() {
        let (first, _) = parse_feed("Mock_data.json", SINGLE, now()).unwrap();
        let later = now() + chrono::Duration::hours(5);
        let (second, _) = parse_feed("Mock_data.json", SINGLE, later).unwrap();

        let keys = |v: &[NewPurchase]| v.iter().map(|p| p.source_key.clone()).collect::<Vec<_>>();
        assert_eq!(keys(&first), keys(&second));
    }

    #[test]
    fn test_shared_transaction_ids_stay_distinct() {
        let content = r#"{
            "users": [
                {"user_id": "alice", "examples": [
                    {"merchant": {"name": "Walmart"}, "transactions": [{"id": 1, "products": [{"name": "Soap"}]}]},
                    {"merchant": {"name": "Walmart"}, "transactions": [{"id": 1, "products": [{"name": "Soap"}]}]}
                ]},
                {"user_id": "bob", "examples": [
                    {"merchant": {"name": "Walmart"}, "transactions": [{"id": 1, "products": [{"name": "Soap"}]}]}
                ]}
            ]
        }"#;
        let (purchases, report) = parse_feed("feed.json", content, now()).unwrap();

        assert_eq!(purchases.len(), 3);
        assert!(report.skipped.is_empty());
        let mut keys: Vec<_> = purchases.iter().map(|p| p.source_key.as_str()).collect();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), 3);
    }

    #[test]
    fn test_separator_in_names_does_not_collide() {
        assert_ne!(
            line_key("a", "b:c", 0, &Value::from("1"), 0),
            line_key("a:b", "c", 0, &Value::from("1"), 0)
        );
        assert_ne!(
            line_key("a", "b", 0, &Value::from("1"), 0),
            line_key("a", "b", 0, &Value::from(1), 0)
        );
    }
}
