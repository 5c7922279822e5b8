//! Error types for the forecast pipeline.
//!
//! - `ValidationError`: rejected before any network call
//! - `ServiceError`: one failed call to an external service
//! - `DispatchError`: a failed per-day batch
//! - `DashboardError`: a dashboard load with nothing to present
//! - `ForecastError`: everything a single forecast query can fail with

use crate::config::DateBounds;
use crate::types::DatePoint;
use thiserror::Error;

/// Reasons a forecast query is rejected before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no store selected")]
    MissingStore,

    #[error("start and end dates are required")]
    MissingDate,

    #[error("date {date} is outside the valid range {} to {}", .bounds.start, .bounds.end)]
    OutOfRange { date: DatePoint, bounds: DateBounds },

    #[error("end date {end} precedes start date {start}")]
    InvertedRange { start: DatePoint, end: DatePoint },

    #[error("invalid date {0:?}: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("unknown store: {0}")]
    UnknownStore(String),
}

impl ValidationError {
    /// Short machine-readable name of the variant.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::MissingStore => "missing_store",
            Self::MissingDate => "missing_date",
            Self::OutOfRange { .. } => "out_of_range",
            Self::InvertedRange { .. } => "inverted_range",
            Self::InvalidDate(_) => "invalid_date",
            Self::UnknownStore(_) => "unknown_store",
        }
    }
}

/// Failure of a single call to the prediction service or a dashboard endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timeout: {0}")]
    Timeout(String),

    #[error("API error: {status_code} - {message}")]
    Api { status_code: u16, message: String },

    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit { retry_after_secs: u64 },

    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl ServiceError {
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }
}

/// Why one call of a batch failed, as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<ServiceError> for CallFailure {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Malformed(msg) => Self::Malformed(msg),
            ServiceError::Timeout(msg) => Self::Timeout(msg),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Failure of a per-day batch. No predictions of a failed batch are used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("prediction for {date} failed: {cause}")]
    PartialFailure { date: DatePoint, cause: CallFailure },

    #[error("all {days} predictions failed, first at {first_date}: {cause}")]
    AllFailed {
        days: usize,
        first_date: DatePoint,
        cause: CallFailure,
    },

    #[error("no dates to dispatch")]
    EmptyBatch,
}

impl DispatchError {
    /// The date the caller should be told about, if any.
    #[must_use]
    pub const fn failed_date(&self) -> Option<DatePoint> {
        match self {
            Self::PartialFailure { date, .. } => Some(*date),
            Self::AllFailed { first_date, .. } => Some(*first_date),
            Self::EmptyBatch => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DashboardError {
    #[error("every dashboard source failed: {0}")]
    AllSourcesUnavailable(String),

    #[error("dashboard load superseded by a newer request")]
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("forecast query superseded by a newer query")]
    Superseded,
}
