#![doc(test(attr(deny(warnings))))]

//! Insight Core turns a raw personal transaction ledger into period
//! aggregates, trend series, budget-vs-actual comparisons, and
//! recurring-expense candidates consumed by presentation layers as
//! plain structured data.

pub mod analytics;
pub mod domain;
pub mod errors;
pub mod ledger;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Insight Core tracing initialized.");
    });
}
