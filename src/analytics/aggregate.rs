use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DateWindow, Direction, Transaction};

use super::period::Granularity;

/// Grouping axes applied on top of the period bucketing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GroupBy {
    Category,
    Direction,
    CategoryDirection,
}

/// Aggregated total for one (period, group key) pair.
///
/// `category`/`direction` are `None` when the grouping does not include
/// that axis. Buckets are derived on every call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PeriodBucket {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub total: f64,
    pub count: usize,
}

/// Groups in-window transactions into period buckets.
///
/// One bucket is produced per (period, group key) combination with at
/// least one matching transaction; empty periods are not synthesized.
/// Ordering is period start ascending, then category, then direction.
pub fn aggregate(
    transactions: &[Transaction],
    window: DateWindow,
    granularity: Granularity,
    group_by: GroupBy,
) -> Vec<PeriodBucket> {
    let mut accumulators: BTreeMap<(NaiveDate, Option<String>, Option<Direction>), (f64, usize)> =
        BTreeMap::new();

    for txn in transactions {
        if !window.contains(txn.occurred_on) {
            continue;
        }
        let period_start = granularity.truncate(txn.occurred_on);
        let (category, direction) = match group_by {
            GroupBy::Category => (Some(txn.category.clone()), None),
            GroupBy::Direction => (None, Some(txn.direction)),
            GroupBy::CategoryDirection => (Some(txn.category.clone()), Some(txn.direction)),
        };
        let entry = accumulators
            .entry((period_start, category, direction))
            .or_insert((0.0, 0));
        entry.0 += txn.amount;
        entry.1 += 1;
    }

    accumulators
        .into_iter()
        .map(|((period_start, category, direction), (total, count))| PeriodBucket {
            period_start,
            period_end: granularity.advance(period_start),
            direction,
            category,
            total,
            count,
        })
        .collect()
}

/// Headline totals for a queried window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LedgerSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub net: f64,
    pub daily_avg_expense: f64,
    pub top_expense_categories: Vec<(String, f64)>,
    pub transaction_count: usize,
    pub expense_count: usize,
    pub income_count: usize,
}

/// Computes headline totals over the in-window transactions: income and
/// expense sums, net, daily average spend over the observed date span,
/// and the top three expense categories.
pub fn summarize(transactions: &[Transaction], window: DateWindow) -> LedgerSummary {
    let mut total_income = 0.0;
    let mut total_expense = 0.0;
    let mut expense_count = 0usize;
    let mut income_count = 0usize;
    let mut by_category: BTreeMap<&str, f64> = BTreeMap::new();
    let mut first_seen: Option<NaiveDate> = None;
    let mut last_seen: Option<NaiveDate> = None;

    for txn in transactions {
        if !window.contains(txn.occurred_on) {
            continue;
        }
        first_seen = Some(first_seen.map_or(txn.occurred_on, |d| d.min(txn.occurred_on)));
        last_seen = Some(last_seen.map_or(txn.occurred_on, |d| d.max(txn.occurred_on)));
        match txn.direction {
            Direction::Income => {
                total_income += txn.amount;
                income_count += 1;
            }
            Direction::Expense => {
                total_expense += txn.amount;
                expense_count += 1;
                *by_category.entry(txn.category.as_str()).or_insert(0.0) += txn.amount;
            }
        }
    }

    let daily_avg_expense = match (first_seen, last_seen) {
        (Some(first), Some(last)) if expense_count > 0 => {
            let span_days = ((last - first).num_days() + 1).max(1) as f64;
            total_expense / span_days
        }
        _ => 0.0,
    };

    let mut ranked: Vec<(String, f64)> = by_category
        .into_iter()
        .map(|(category, total)| (category.to_string(), total))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked.truncate(3);

    LedgerSummary {
        total_income,
        total_expense,
        net: total_income - total_expense,
        daily_avg_expense,
        top_expense_categories: ranked,
        transaction_count: expense_count + income_count,
        expense_count,
        income_count,
    }
}
