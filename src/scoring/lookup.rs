use std::collections::HashMap;

use crate::model::ReferenceTable;

/// In-memory copy of both reference tables, keyed by exact name.
///
/// Loaded once per scoring run so each purchase costs two map lookups instead
/// of two database round-trips.
#[derive(Debug, Clone, Default)]
pub struct ReferenceScores {
    stores: HashMap<String, f64>,
    brands: HashMap<String, f64>,
}

impl ReferenceScores {
    pub fn new(stores: HashMap<String, f64>, brands: HashMap<String, f64>) -> Self {
        Self { stores, brands }
    }

    /// Score for `name` in `table`, or 0 when there is no such entry.
    /// Matching is exact: no trimming, no case folding.
    pub fn score(&self, table: ReferenceTable, name: &str) -> f64 {
        let map = match table {
            ReferenceTable::Store => &self.stores,
            ReferenceTable::Brand => &self.brands,
        };
        map.get(name).copied().unwrap_or(0.0)
    }

    pub fn store_score(&self, store: &str) -> f64 {
        self.score(ReferenceTable::Store, store)
    }

    pub fn brand_score(&self, brand: &str) -> f64 {
        self.score(ReferenceTable::Brand, brand)
    }

    /// `store_score + brand_score` for one line-item.
    pub fn combined_score(&self, store: &str, brand: &str) -> f64 {
        self.store_score(store) + self.brand_score(brand)
    }

    pub fn len(&self, table: ReferenceTable) -> usize {
        match table {
            ReferenceTable::Store => self.stores.len(),
            ReferenceTable::Brand => self.brands.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty() && self.brands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceScores {
        ReferenceScores::new(
            HashMap::from([("Walmart".to_string(), 10.0), ("Target".to_string(), -4.5)]),
            HashMap::from([("Acme".to_string(), 5.0)]),
        )
    }

    #[test]
    fn test_known_names() {
        let refs = sample();
        assert_eq!(refs.store_score("Walmart"), 10.0);
        assert_eq!(refs.store_score("Target"), -4.5);
        assert_eq!(refs.brand_score("Acme"), 5.0);
    }

    #[test]
    fn test_unknown_name_scores_zero() {
        let refs = sample();
        assert_eq!(refs.store_score("Costco"), 0.0);
        assert_eq!(refs.brand_score("Unknown"), 0.0);
        assert_eq!(refs.combined_score("Costco", "Unknown"), 0.0);
    }

    #[test]
    fn test_exact_match_only() {
        let refs = sample();
        assert_eq!(refs.store_score("walmart"), 0.0);
        assert_eq!(refs.store_score(" Walmart"), 0.0);
    }

    #[test]
    fn test_tables_are_separate() {
        let refs = sample();
        assert_eq!(refs.brand_score("Walmart"), 0.0);
        assert_eq!(refs.store_score("Acme"), 0.0);
    }

    #[test]
    fn test_combined_score() {
        let refs = sample();
        assert_eq!(refs.combined_score("Walmart", "Acme"), 15.0);
        assert_eq!(refs.combined_score("Target", "Nobody"), -4.5);
    }

    #[test]
    fn test_len() {
        let refs = sample();
        assert_eq!(refs.len(ReferenceTable::Store), 2);
        assert_eq!(refs.len(ReferenceTable::Brand), 1);
        assert!(!refs.is_empty());
        assert!(ReferenceScores::default().is_empty());
    }
}
