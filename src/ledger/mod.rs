//! In-memory transaction store exposed to the analytics engine.
//!
//! This is the query seam the engine pulls snapshots through; persistence
//! and editing live outside the crate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DateWindow, Direction, Transaction};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional narrowing applied on top of the date window.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub direction: Option<Direction>,
    pub categories: Option<Vec<String>>,
}

impl TransactionFilter {
    pub fn matches(&self, txn: &Transaction) -> bool {
        if let Some(direction) = self.direction {
            if txn.direction != direction {
                return false;
            }
        }
        if let Some(categories) = &self.categories {
            if !categories.iter().any(|c| c == &txn.category) {
                return false;
            }
        }
        true
    }
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            transactions: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_transaction(&mut self, transaction: Transaction) -> Uuid {
        let id = transaction.id;
        self.transactions.push(transaction);
        self.touch();
        id
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Returns the in-window transactions matching `filter`, ordered by
    /// occurrence date ascending with a stable id tie-break.
    pub fn query(&self, window: DateWindow, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut results: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|txn| window.contains(txn.occurred_on) && filter.matches(txn))
            .collect();
        results.sort_by_key(|txn| (txn.occurred_on, txn.id));
        results
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new("Household");
        ledger.add_transaction(Transaction::new(
            date(2024, 1, 10),
            45.0,
            Direction::Expense,
            "groceries",
        ));
        ledger.add_transaction(Transaction::new(
            date(2024, 1, 5),
            2500.0,
            Direction::Income,
            "salary",
        ));
        ledger.add_transaction(Transaction::new(
            date(2024, 2, 2),
            60.0,
            Direction::Expense,
            "groceries",
        ));
        ledger
    }

    #[test]
    fn query_orders_by_date() {
        let ledger = sample_ledger();
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 3, 1)).unwrap();
        let results = ledger.query(window, &TransactionFilter::default());
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].occurred_on, date(2024, 1, 5));
        assert_eq!(results[2].occurred_on, date(2024, 2, 2));
    }

    #[test]
    fn query_applies_window_and_filters() {
        let ledger = sample_ledger();
        let window = DateWindow::new(date(2024, 1, 1), date(2024, 2, 1)).unwrap();
        let filter = TransactionFilter {
            direction: Some(Direction::Expense),
            categories: Some(vec!["groceries".into()]),
        };
        let results = ledger.query(window, &filter);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].amount, 45.0);
    }

    #[test]
    fn same_day_entries_tie_break_on_id() {
        let mut ledger = Ledger::new("Ties");
        let a = ledger.add_transaction(Transaction::new(
            date(2024, 3, 1),
            10.0,
            Direction::Expense,
            "coffee",
        ));
        let b = ledger.add_transaction(Transaction::new(
            date(2024, 3, 1),
            12.0,
            Direction::Expense,
            "coffee",
        ));
        let window = DateWindow::new(date(2024, 3, 1), date(2024, 3, 2)).unwrap();
        let results = ledger.query(window, &TransactionFilter::default());
        let ids: Vec<_> = results.iter().map(|txn| txn.id).collect();
        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(ids, expected);
    }
}
