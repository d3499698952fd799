#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use insight_core::domain::{Direction, Transaction};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn expense(occurred_on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(occurred_on, amount, Direction::Expense, category)
}

pub fn income(occurred_on: NaiveDate, amount: f64, category: &str) -> Transaction {
    Transaction::new(occurred_on, amount, Direction::Income, category)
}

/// A run of identical expenses spaced `gap_days` apart.
pub fn spaced_expenses(
    start: NaiveDate,
    count: usize,
    gap_days: i64,
    amount: f64,
    category: &str,
) -> Vec<Transaction> {
    (0..count)
        .map(|idx| {
            expense(
                start + Duration::days(gap_days * idx as i64),
                amount,
                category,
            )
        })
        .collect()
}
