//! Recurring-expense detection over an unlabeled transaction history.
//!
//! Groups expenses by (category, note signature, amount cluster), then
//! accepts groups whose inter-occurrence gaps are regular enough and match
//! a known cadence. Thresholds are approximations of real-world noise and
//! live in [`DetectorConfig`] rather than constants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DateWindow, Direction, Transaction};
use crate::errors::{AnalyticsError, AnalyticsResult};

/// Known recurrence cadences.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Cadence {
    Daily,
    Weekly,
    Biweekly,
    Monthly,
    Quarterly,
    Annual,
}

/// A cadence with the gap range (in days) a median gap may fall into to
/// be assigned to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CadenceBucket {
    pub cadence: Cadence,
    pub interval_days: u32,
    pub min_gap: f64,
    pub max_gap: f64,
}

impl CadenceBucket {
    fn new(cadence: Cadence, interval_days: u32, min_gap: f64, max_gap: f64) -> Self {
        Self {
            cadence,
            interval_days,
            min_gap,
            max_gap,
        }
    }

    fn matches(&self, median_gap: f64) -> bool {
        median_gap >= self.min_gap && median_gap <= self.max_gap
    }
}

/// Detection thresholds. The defaults are reasonable for personal-ledger
/// noise but are expected to be tuned per deployment.
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Relative amount difference merged into one candidate group.
    pub amount_tolerance: f64,
    /// Maximum coefficient of variation (stddev / mean) of gaps.
    pub gap_cv_tolerance: f64,
    /// Minimum occurrences inside the lookback window.
    pub min_occurrences: usize,
    pub cadences: Vec<CadenceBucket>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: 0.02,
            gap_cv_tolerance: 0.25,
            min_occurrences: 3,
            cadences: vec![
                CadenceBucket::new(Cadence::Daily, 1, 0.5, 1.5),
                CadenceBucket::new(Cadence::Weekly, 7, 6.0, 8.0),
                CadenceBucket::new(Cadence::Biweekly, 14, 12.0, 16.0),
                CadenceBucket::new(Cadence::Monthly, 30, 28.0, 31.5),
                CadenceBucket::new(Cadence::Quarterly, 91, 85.0, 95.0),
                CadenceBucket::new(Cadence::Annual, 365, 355.0, 375.0),
            ],
        }
    }
}

impl DetectorConfig {
    fn validate(&self) -> AnalyticsResult<()> {
        if self.amount_tolerance < 0.0 {
            return Err(AnalyticsError::InvalidParameter(
                "amount tolerance must be non-negative".into(),
            ));
        }
        if self.gap_cv_tolerance <= 0.0 {
            return Err(AnalyticsError::InvalidParameter(
                "gap variation tolerance must be positive".into(),
            ));
        }
        if self.min_occurrences < 2 {
            return Err(AnalyticsError::InvalidParameter(
                "recurrence needs at least two occurrences".into(),
            ));
        }
        if self.cadences.is_empty() {
            return Err(AnalyticsError::InvalidParameter(
                "at least one cadence bucket is required".into(),
            ));
        }
        Ok(())
    }
}

/// A detected, not user-confirmed, likely recurring expense group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurrenceCandidate {
    pub category: String,
    pub note_signature: String,
    pub approx_amount: f64,
    pub interval_days: u32,
    pub cadence: Cadence,
    pub confidence: f64,
    pub matched_transaction_ids: Vec<Uuid>,
}

/// Collapses a free-form note into a grouping key: lowercased, digits
/// stripped, whitespace collapsed. "Netflix 2024-01" and "NETFLIX 2024-02"
/// land in the same group.
fn note_signature(note: Option<&str>) -> String {
    let mut signature = String::new();
    let mut pending_space = false;
    for ch in note.unwrap_or_default().chars() {
        if ch.is_ascii_digit() {
            continue;
        }
        if ch.is_whitespace() {
            pending_space = !signature.is_empty();
            continue;
        }
        if pending_space {
            signature.push(' ');
            pending_space = false;
        }
        for lower in ch.to_lowercase() {
            signature.push(lower);
        }
    }
    signature
}

struct GapStats {
    mean: f64,
    coefficient_of_variation: f64,
    median: f64,
}

fn gap_stats(gaps: &[f64]) -> Option<GapStats> {
    if gaps.is_empty() {
        return None;
    }
    let mean = gaps.iter().sum::<f64>() / gaps.len() as f64;
    if mean <= 0.0 {
        return None;
    }
    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / gaps.len() as f64;
    let coefficient_of_variation = variance.sqrt() / mean;

    let mut sorted = gaps.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    let median = if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    };

    Some(GapStats {
        mean,
        coefficient_of_variation,
        median,
    })
}

/// Identifies likely recurring expenses inside the lookback window.
///
/// Groups that are too irregular, too sparse, or match no known cadence are
/// discarded rather than returned as low-confidence noise. Candidates come
/// back ordered by confidence descending, ties by category and signature.
pub fn detect(
    transactions: &[Transaction],
    lookback: DateWindow,
    config: &DetectorConfig,
) -> AnalyticsResult<Vec<RecurrenceCandidate>> {
    config.validate()?;

    // (category, signature) -> occurrences, date-sorted.
    let mut groups: BTreeMap<(String, String), Vec<&Transaction>> = BTreeMap::new();
    for txn in transactions {
        if txn.direction != Direction::Expense || !lookback.contains(txn.occurred_on) {
            continue;
        }
        let key = (txn.category.clone(), note_signature(txn.note.as_deref()));
        groups.entry(key).or_default().push(txn);
    }

    let mut candidates = Vec::new();
    for ((category, signature), mut occurrences) in groups {
        occurrences.sort_by_key(|txn| (txn.occurred_on, txn.id));
        for cluster in cluster_by_amount(&occurrences, config.amount_tolerance) {
            if let Some(candidate) =
                evaluate_cluster(&category, &signature, &cluster, lookback, config)
            {
                candidates.push(candidate);
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
            .then_with(|| a.note_signature.cmp(&b.note_signature))
    });
    tracing::debug!(
        candidates = candidates.len(),
        "recurrence detection finished"
    );
    Ok(candidates)
}

/// Splits a date-sorted group into amount clusters: exact matching is too
/// strict given minor fee variance, so amounts within the relative
/// tolerance of a cluster's anchor merge together.
fn cluster_by_amount<'a>(
    occurrences: &[&'a Transaction],
    tolerance: f64,
) -> Vec<Vec<&'a Transaction>> {
    let mut by_amount: Vec<&Transaction> = occurrences.to_vec();
    by_amount.sort_by(|a, b| {
        a.amount
            .partial_cmp(&b.amount)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut clusters: Vec<Vec<&Transaction>> = Vec::new();
    let mut anchor = 0.0;
    for txn in by_amount {
        let merged = match clusters.last_mut() {
            Some(cluster) if txn.amount <= anchor * (1.0 + tolerance) => {
                cluster.push(txn);
                true
            }
            _ => false,
        };
        if !merged {
            anchor = txn.amount;
            clusters.push(vec![txn]);
        }
    }
    for cluster in &mut clusters {
        cluster.sort_by_key(|txn| (txn.occurred_on, txn.id));
    }
    clusters
}

fn evaluate_cluster(
    category: &str,
    signature: &str,
    cluster: &[&Transaction],
    lookback: DateWindow,
    config: &DetectorConfig,
) -> Option<RecurrenceCandidate> {
    if cluster.len() < config.min_occurrences {
        return None;
    }
    let gaps: Vec<f64> = cluster
        .windows(2)
        .map(|pair| (pair[1].occurred_on - pair[0].occurred_on).num_days() as f64)
        .collect();
    let stats = gap_stats(&gaps)?;
    if stats.coefficient_of_variation > config.gap_cv_tolerance {
        return None;
    }
    let bucket = config
        .cadences
        .iter()
        .find(|bucket| bucket.matches(stats.median))?;

    // Confidence: how regular the gaps are, weighted with how much of the
    // window's cadence capacity the occurrences actually confirm.
    let regularity = (1.0 - stats.coefficient_of_variation / config.gap_cv_tolerance).clamp(0.0, 1.0);
    let capacity = lookback.num_days() as f64 / bucket.interval_days as f64;
    let coverage = (cluster.len() as f64 / capacity).min(1.0);
    let confidence = 0.6 * regularity + 0.4 * coverage;

    let approx_amount = cluster.iter().map(|txn| txn.amount).sum::<f64>() / cluster.len() as f64;

    tracing::debug!(
        category,
        signature,
        occurrences = cluster.len(),
        mean_gap = stats.mean,
        cv = stats.coefficient_of_variation,
        cadence = ?bucket.cadence,
        "accepted recurrence candidate"
    );

    Some(RecurrenceCandidate {
        category: category.to_string(),
        note_signature: signature.to_string(),
        approx_amount,
        interval_days: bucket.interval_days,
        cadence: bucket.cadence,
        confidence,
        matched_transaction_ids: cluster.iter().map(|txn| txn.id).collect(),
    })
}

/// A single transaction whose amount stands far above its category's norm.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AmountOutlier {
    pub transaction_id: Uuid,
    pub category: String,
    pub amount: f64,
    pub category_mean: f64,
    pub ratio: f64,
}

/// Flags expenses more than two standard deviations above their category
/// mean and at least twice the mean. Categories with fewer than three
/// expenses are skipped; there is no baseline to deviate from.
pub fn outliers(transactions: &[Transaction], window: DateWindow) -> Vec<AmountOutlier> {
    let mut by_category: BTreeMap<&str, Vec<&Transaction>> = BTreeMap::new();
    for txn in transactions {
        if txn.direction == Direction::Expense && window.contains(txn.occurred_on) {
            by_category.entry(txn.category.as_str()).or_default().push(txn);
        }
    }

    let mut flagged = Vec::new();
    for (category, entries) in by_category {
        if entries.len() < 3 {
            continue;
        }
        let mean = entries.iter().map(|txn| txn.amount).sum::<f64>() / entries.len() as f64;
        let variance = entries
            .iter()
            .map(|txn| (txn.amount - mean).powi(2))
            .sum::<f64>()
            / entries.len() as f64;
        let stddev = variance.sqrt();
        if stddev == 0.0 || mean <= 0.0 {
            continue;
        }
        let threshold = mean + 2.0 * stddev;
        for txn in entries {
            let ratio = txn.amount / mean;
            if txn.amount > threshold && ratio >= 2.0 {
                flagged.push(AmountOutlier {
                    transaction_id: txn.id,
                    category: category.to_string(),
                    amount: txn.amount,
                    category_mean: mean,
                    ratio,
                });
            }
        }
    }
    flagged.sort_by(|a, b| {
        b.ratio
            .partial_cmp(&a.ratio)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    flagged
}
