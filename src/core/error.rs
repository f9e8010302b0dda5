use thiserror::Error;

/// Errors produced by the analytics engines
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalyticsError {
    /// Not enough qualifying data to publish a statistic. The caller keeps
    /// whatever value it published before.
    #[error("Insufficient data: {available} qualifying rounds, {required} required")]
    InsufficientData { available: usize, required: usize },

    /// Fewer than two distinct courses to compare.
    #[error("Pairing unavailable: {available} distinct courses, at least 2 required")]
    Unavailable { available: usize },

    /// Malformed input handed to an engine.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AnalyticsError {
    /// Recoverable errors mean "try again with more data", not a fault
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalyticsError::InsufficientData { .. } | AnalyticsError::Unavailable { .. }
        )
    }
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;
