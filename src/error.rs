use thiserror::Error;

/// Errors surfaced by loading and by the aggregation/filter engine.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A malformed query or filter (inverted range, `top_n < 1`, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The sales source could not be fetched or returned an unusable payload.
    #[error("data source '{source_name}' is unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },
}

impl DashboardError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        DashboardError::InvalidArgument(msg.into())
    }
}
