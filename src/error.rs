use thiserror::Error;

/// Errors surfaced by the dashboard helper contracts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DashError {
    #[error("column '{0}' not found in dataset")]
    ColumnNotFound(String),

    #[error("column '{0}' contains no parseable dates")]
    NoDatesInColumn(String),

    #[error("unsupported aggregation function: '{0}'")]
    UnsupportedAggregation(String),
}
