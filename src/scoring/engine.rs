use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::config::ScoringConfig;
use super::harmful::rank_harmful;
use super::lookup::ReferenceScores;
use super::normalize::scale_score;
use crate::model::{HarmfulProduct, PurchaseRecord, UserScore};

/// Everything one scoring pass derives from the ledger.
#[derive(Debug, Clone, Default)]
pub struct ScoreRun {
    /// One entry per user in the ledger, in leaderboard order.
    pub users: Vec<UserScore>,
    /// Lowest-scoring line-items per user.
    pub harmful: BTreeMap<String, Vec<HarmfulProduct>>,
    pub purchases_scored: usize,
}

impl ScoreRun {
    pub fn user(&self, user_id: &str) -> Option<&UserScore> {
        self.users.iter().find(|u| u.user_id == user_id)
    }

    pub fn harmful_for(&self, user_id: &str) -> &[HarmfulProduct] {
        self.harmful.get(user_id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Sum of combined scores over every line-item, one term per row.
pub fn total_score<'a, I>(purchases: I, refs: &ReferenceScores) -> f64
where
    I: IntoIterator<Item = &'a PurchaseRecord>,
{
    purchases
        .into_iter()
        .map(|p| refs.combined_score(&p.store, &p.brand))
        .sum()
}

/// Group line-items by user. Only users with at least one purchase appear.
pub fn group_by_user(purchases: &[PurchaseRecord]) -> BTreeMap<&str, Vec<&PurchaseRecord>> {
    let mut by_user: BTreeMap<&str, Vec<&PurchaseRecord>> = BTreeMap::new();
    for p in purchases {
        by_user.entry(p.user_id.as_str()).or_default().push(p);
    }
    by_user
}

/// Score every user in `purchases` against `refs`.
pub fn compute_scores(
    purchases: &[PurchaseRecord],
    refs: &ReferenceScores,
    config: &ScoringConfig,
) -> ScoreRun {
    let by_user = group_by_user(purchases);

    let mut users = Vec::with_capacity(by_user.len());
    let mut harmful = BTreeMap::new();

    for (user_id, items) in &by_user {
        let total = total_score(items.iter().copied(), refs);
        users.push(UserScore {
            user_id: user_id.to_string(),
            total_score: total,
            scaled_score: scale_score(total, config.max_possible_score, config.rounding),
        });
        harmful.insert(
            user_id.to_string(),
            rank_harmful(items.iter().copied(), refs, config.harmful_limit),
        );
    }

    sort_leaderboard(&mut users);

    ScoreRun {
        users,
        harmful,
        purchases_scored: purchases.len(),
    }
}

/// Scaled score descending, then user_id ascending for ties.
pub fn sort_leaderboard(users: &mut [UserScore]) {
    users.sort_by(|a, b| {
        // Primary: score descending
        let score_cmp = b
            .scaled_score
            .partial_cmp(&a.scaled_score)
            .unwrap_or(Ordering::Equal);
        if score_cmp != Ordering::Equal {
            return score_cmp;
        }
        a.user_id.cmp(&b.user_id)
    });
}
