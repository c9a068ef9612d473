use crate::models::*;
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Data Provider Trait
// ---------------------------------------------------------------------------

/// Errors that can occur during data operations.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Data not found: {0}")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid series: {0}")]
    InvalidSeries(String),
}

/// Hands the engine a fully materialized series.
///
/// Source selection, credentials and retries belong to implementors; the
/// engine only ever sees the returned [`Series`].
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Load every available bar for an instrument at the given interval.
    async fn load_series(&self, instrument: &str, interval: Interval) -> Result<Series, DataError>;

    /// List available instruments.
    async fn available_instruments(&self) -> Result<Vec<String>, DataError>;
}
