use std::cmp::Ordering;

use super::lookup::ReferenceScores;
use crate::model::{HarmfulProduct, PurchaseRecord};

/// Rank one user's line-items from lowest to highest combined score and keep
/// the first `limit`.
///
/// Scores are looked up afresh here rather than taken from the aggregate
/// pass. Equal scores keep ledger order (ascending `id`).
pub fn rank_harmful<'a, I>(purchases: I, refs: &ReferenceScores, limit: usize) -> Vec<HarmfulProduct>
where
    I: IntoIterator<Item = &'a PurchaseRecord>,
{
    let mut ranked: Vec<(i64, HarmfulProduct)> = purchases
        .into_iter()
        .map(|p| {
            let store_score = refs.store_score(&p.store);
            let brand_score = refs.brand_score(&p.brand);
            let entry = HarmfulProduct {
                product_name: p.product_name.clone(),
                store: p.store.clone(),
                brand: p.brand.clone(),
                score: store_score + brand_score,
                store_score,
                brand_score,
            };
            (p.id, entry)
        })
        .collect();

    ranked.sort_by(|a, b| {
        // Primary: score ascending
        let score_cmp = a.1.score.partial_cmp(&b.1.score).unwrap_or(Ordering::Equal);
        if score_cmp != Ordering::Equal {
            return score_cmp;
        }
        // Tie-breaker: ledger order
        a.0.cmp(&b.0)
    });

    ranked.into_iter().take(limit).map(|(_, entry)| entry).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn purchase(id: i64, store: &str, brand: &str, product: &str) -> PurchaseRecord {
        PurchaseRecord {
            id,
            user_id: "u".to_string(),
            store: store.to_string(),
            brand: brand.to_string(),
            product_name: product.to_string(),
            quantity: 1.0,
            unit_price: 0.0,
            total_price: 0.0,
            timestamp: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    fn refs() -> ReferenceScores {
        ReferenceScores::new(
            HashMap::from([("StoreA".to_string(), 10.0), ("StoreB".to_string(), 2.0)]),
            HashMap::from([("BrandX".to_string(), 5.0), ("BrandY".to_string(), 1.0)]),
        )
    }

    fn names(ranked: &[HarmfulProduct]) -> Vec<&str> {
        ranked.iter().map(|h| h.product_name.as_str()).collect()
    }

    #[test]
    fn test_scenario_soap_soda() {
        let purchases = vec![
            purchase(1, "StoreA", "BrandX", "Soap"),
            purchase(2, "StoreB", "BrandY", "Soda"),
        ];
        let ranked = rank_harmful(&purchases, &refs(), 5);

        assert_eq!(names(&ranked), vec!["Soda", "Soap"]);
        assert_eq!(ranked[0].score, 3.0);
        assert_eq!(ranked[0].store_score, 2.0);
        assert_eq!(ranked[0].brand_score, 1.0);
        assert_eq!(ranked[1].score, 15.0);
    }

    #[test]
    fn test_truncates_to_limit() {
        let purchases: Vec<_> = (0..8)
            .map(|i| purchase(i, "StoreA", "BrandX", &format!("item{}", i)))
            .collect();
        assert_eq!(rank_harmful(&purchases, &refs(), 5).len(), 5);
        assert_eq!(rank_harmful(&purchases, &refs(), 3).len(), 3);
    }

    #[test]
    fn test_fewer_items_than_limit() {
        let purchases = vec![purchase(1, "StoreA", "BrandX", "Soap")];
        assert_eq!(rank_harmful(&purchases, &refs(), 5).len(), 1);
        assert!(rank_harmful(&Vec::new(), &refs(), 5).is_empty());
    }

    #[test]
    fn test_ties_keep_ledger_order() {
        let purchases = vec![
            purchase(7, "StoreA", "BrandX", "late"),
            purchase(3, "StoreA", "BrandX", "early"),
            purchase(5, "StoreB", "BrandY", "cheap"),
        ];
        let ranked = rank_harmful(&purchases, &refs(), 5);
        assert_eq!(names(&ranked), vec!["cheap", "early", "late"]);
    }

    #[test]
    fn test_duplicates_not_collapsed() {
        let purchases = vec![
            purchase(1, "StoreB", "BrandY", "Soda"),
            purchase(2, "StoreB", "BrandY", "Soda"),
        ];
        let ranked = rank_harmful(&purchases, &refs(), 5);
        assert_eq!(names(&ranked), vec!["Soda", "Soda"]);
    }

    #[test]
    fn test_unknown_names_rank_as_zero() {
        let purchases = vec![
            purchase(1, "StoreB", "BrandY", "Soda"),
            purchase(2, "Nowhere", "Unknown", "Mystery"),
        ];
        let ranked = rank_harmful(&purchases, &refs(), 5);
        assert_eq!(names(&ranked), vec!["Mystery", "Soda"]);
        assert_eq!(ranked[0].score, 0.0);
    }

    #[test]
    fn test_ascending_order() {
        let purchases = vec![
            purchase(1, "StoreA", "BrandX", "a"),
            purchase(2, "StoreB", "BrandX", "b"),
            purchase(3, "StoreB", "BrandY", "c"),
            purchase(4, "StoreA", "BrandY", "d"),
        ];
        let ranked = rank_harmful(&purchases, &refs(), 5);
        let scores: Vec<f64> = ranked.iter().map(|h| h.score).collect();
        assert_eq!(scores, vec![3.0, 7.0, 11.0, 15.0]);
    }
}
