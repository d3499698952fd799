//! The analytics engine: aggregation, trends, budget comparison, and
//! recurrence detection over an immutable transaction snapshot.
//!
//! Every entry point is a pure function; callers fetch transactions through
//! the ledger seam and pass them in, and each call recomputes from scratch.

pub mod aggregate;
pub mod budget;
pub mod period;
pub mod recurring;
pub mod trend;

pub use aggregate::{aggregate, summarize, GroupBy, LedgerSummary, PeriodBucket};
pub use budget::{compare, BudgetStatus};
pub use period::Granularity;
pub use recurring::{
    detect, outliers, AmountOutlier, Cadence, CadenceBucket, DetectorConfig, RecurrenceCandidate,
};
pub use trend::{
    compare_latest_periods, dense_series, moving_average, trend, ChangeDirection, TrendConfig,
    TrendPoint, TrendReport,
};
