use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::BudgetLimit;

use super::aggregate::PeriodBucket;

/// Budget-vs-actual standing for one category in one period.
///
/// `limit`, `remaining`, and `pct_used` are `None` for categories with
/// spend but no configured limit; an unset limit can never be exceeded.
/// A zero limit also reports `pct_used = None` to avoid a divide by zero,
/// while any spend against it still counts as over budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetStatus {
    pub category: String,
    pub spent: f64,
    pub limit: Option<f64>,
    pub remaining: Option<f64>,
    pub pct_used: Option<f64>,
    pub over_budget: bool,
}

/// Matches per-category spend against configured limits.
///
/// `expense_buckets` is the aggregator output for the period under review,
/// grouped by category. Results are ordered most-stressed first: `pct_used`
/// descending, unset percentages last, ties by category name.
pub fn compare(expense_buckets: &[PeriodBucket], limits: &[BudgetLimit]) -> Vec<BudgetStatus> {
    let mut spent_by_category: BTreeMap<String, f64> = BTreeMap::new();
    for bucket in expense_buckets {
        let key = bucket.category.clone().unwrap_or_default();
        *spent_by_category.entry(key).or_insert(0.0) += bucket.total;
    }

    let mut limit_by_category: BTreeMap<&str, f64> = BTreeMap::new();
    for limit in limits {
        limit_by_category.insert(limit.category.as_str(), limit.limit_amount);
    }
    // Categories with a limit but no spend still get a row.
    for category in limit_by_category.keys() {
        spent_by_category.entry(category.to_string()).or_insert(0.0);
    }

    let mut statuses: Vec<BudgetStatus> = spent_by_category
        .into_iter()
        .map(|(category, spent)| {
            let limit = limit_by_category.get(category.as_str()).copied();
            let (remaining, pct_used, over_budget) = match limit {
                Some(limit_amount) if limit_amount > 0.0 => (
                    Some(limit_amount - spent),
                    Some(spent / limit_amount),
                    spent > limit_amount,
                ),
                Some(limit_amount) => (Some(limit_amount - spent), None, spent > 0.0),
                None => (None, None, false),
            };
            BudgetStatus {
                category,
                spent,
                limit,
                remaining,
                pct_used,
                over_budget,
            }
        })
        .collect();

    statuses.sort_by(|a, b| match (a.pct_used, b.pct_used) {
        (Some(left), Some(right)) => right
            .partial_cmp(&left)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.category.cmp(&b.category),
    });
    statuses
}
