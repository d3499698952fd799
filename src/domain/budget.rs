use serde::{Deserialize, Serialize};

/// A spending guardrail for a specific category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetLimit {
    pub category: String,
    pub limit_amount: f64,
    pub period_kind: PeriodKind,
}

impl BudgetLimit {
    pub fn monthly(category: impl Into<String>, limit_amount: f64) -> Self {
        Self {
            category: category.into(),
            limit_amount,
            period_kind: PeriodKind::Monthly,
        }
    }
}

/// Enumeration of budgeting periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PeriodKind {
    #[default]
    Monthly,
}
