use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::DateWindow;
use crate::errors::{AnalyticsError, AnalyticsResult};

use super::aggregate::PeriodBucket;
use super::period::Granularity;

/// Tuning knobs for trend classification.
#[derive(Debug, Clone)]
pub struct TrendConfig {
    /// Relative change below which a movement is reported as flat.
    pub flat_threshold: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            flat_threshold: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
    Flat,
}

/// Period-over-period movement for one category.
///
/// `delta_pct` is `None` when the prior period had no spend to compare
/// against; callers render that as "no prior data" rather than a number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendReport {
    pub category: String,
    pub current_total: f64,
    pub prior_total: f64,
    pub delta_amount: f64,
    pub delta_pct: Option<f64>,
    pub direction_of_change: ChangeDirection,
}

/// One gap-filled point of a trend series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendPoint {
    pub period_start: NaiveDate,
    pub total: f64,
}

fn category_totals(buckets: &[PeriodBucket]) -> BTreeMap<String, f64> {
    let mut totals = BTreeMap::new();
    for bucket in buckets {
        let key = bucket.category.clone().unwrap_or_default();
        *totals.entry(key).or_insert(0.0) += bucket.total;
    }
    totals
}

/// Compares two adjacent periods of category-grouped buckets.
///
/// A category present on only one side contributes a zero total on the
/// other, so new and vanished categories still get a report.
pub fn trend(
    current: &[PeriodBucket],
    prior: &[PeriodBucket],
    config: &TrendConfig,
) -> Vec<TrendReport> {
    let current_totals = category_totals(current);
    let prior_totals = category_totals(prior);

    let mut categories: Vec<&String> = current_totals.keys().collect();
    for key in prior_totals.keys() {
        if !current_totals.contains_key(key) {
            categories.push(key);
        }
    }
    categories.sort();

    categories
        .into_iter()
        .map(|category| {
            let current_total = current_totals.get(category).copied().unwrap_or(0.0);
            let prior_total = prior_totals.get(category).copied().unwrap_or(0.0);
            let delta_amount = current_total - prior_total;
            let delta_pct = if prior_total == 0.0 {
                if current_total == 0.0 {
                    Some(0.0)
                } else {
                    None
                }
            } else {
                Some(delta_amount / prior_total)
            };
            let direction_of_change = match delta_pct {
                Some(pct) if pct.abs() < config.flat_threshold => ChangeDirection::Flat,
                Some(pct) if pct > 0.0 => ChangeDirection::Up,
                Some(_) => ChangeDirection::Down,
                // No prior baseline: classify on the raw movement.
                None if delta_amount > 0.0 => ChangeDirection::Up,
                None => ChangeDirection::Down,
            };
            TrendReport {
                category: category.clone(),
                current_total,
                prior_total,
                delta_amount,
                delta_pct,
                direction_of_change,
            }
        })
        .collect()
}

/// Collapses buckets into one point per period across the window, filling
/// periods with no bucket with a zero total. The result is dense: exactly
/// one point per period covering the window, in ascending order.
pub fn dense_series(
    buckets: &[PeriodBucket],
    window: DateWindow,
    granularity: Granularity,
) -> Vec<TrendPoint> {
    let mut per_period: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for bucket in buckets {
        *per_period.entry(bucket.period_start).or_insert(0.0) += bucket.total;
    }
    granularity
        .periods_covering(window.start, window.end)
        .into_iter()
        .map(|period_start| TrendPoint {
            period_start,
            total: per_period.get(&period_start).copied().unwrap_or(0.0),
        })
        .collect()
}

/// Simple moving average with a full-window requirement: output length is
/// `series.len() - window_size + 1`, no partial-window values.
pub fn moving_average(series: &[f64], window_size: usize) -> AnalyticsResult<Vec<f64>> {
    if window_size == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "moving average window must be at least 1".into(),
        ));
    }
    if window_size > series.len() {
        return Err(AnalyticsError::InvalidParameter(format!(
            "moving average window {} exceeds series length {}",
            window_size,
            series.len()
        )));
    }
    Ok(series
        .windows(window_size)
        .map(|chunk| chunk.iter().sum::<f64>() / window_size as f64)
        .collect())
}

/// Splits the newest period out of a bucket series and compares it against
/// the period before it. Fails with `InsufficientData` when the series
/// holds fewer than two distinct periods.
pub fn compare_latest_periods(
    buckets: &[PeriodBucket],
    config: &TrendConfig,
) -> AnalyticsResult<Vec<TrendReport>> {
    let mut period_starts: Vec<NaiveDate> = buckets.iter().map(|b| b.period_start).collect();
    period_starts.sort();
    period_starts.dedup();

    let (latest, prior) = match period_starts.as_slice() {
        [.., prior, latest] => (*latest, *prior),
        _ => {
            return Err(AnalyticsError::InsufficientData(
                "trend comparison needs at least two periods".into(),
            ))
        }
    };

    let current: Vec<PeriodBucket> = buckets
        .iter()
        .filter(|b| b.period_start == latest)
        .cloned()
        .collect();
    let previous: Vec<PeriodBucket> = buckets
        .iter()
        .filter(|b| b.period_start == prior)
        .cloned()
        .collect();
    Ok(trend(&current, &previous, config))
}
