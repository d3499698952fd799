use thiserror::Error;

/// Error type that captures analytics call failures.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Insufficient data: {0}")]
    InsufficientData(String),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
