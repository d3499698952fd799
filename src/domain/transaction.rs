use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a transaction adds to or draws from the ledger.
///
/// Amounts are stored as non-negative values; the direction alone
/// encodes the sign.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Income => "income",
            Direction::Expense => "expense",
        }
    }
}

/// A single ledger entry. Immutable once handed to the analytics engine;
/// edits happen in the surrounding CRUD layer and show up as a fresh
/// snapshot on the next call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub occurred_on: NaiveDate,
    pub amount: f64,
    pub direction: Direction,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn new(
        occurred_on: NaiveDate,
        amount: f64,
        direction: Direction,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            occurred_on,
            amount,
            direction,
            category: category.into(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}
