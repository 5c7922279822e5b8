use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sales_forecast_core::{DashboardError, DatePoint, ForecastError, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DatePoint>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Forecast(#[from] ForecastError),

    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Forecast(ForecastError::Validation(err))
    }
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Forecast(ForecastError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Forecast(ForecastError::Dispatch(_))
            | Self::Dashboard(DashboardError::AllSourcesUnavailable(_)) => StatusCode::BAD_GATEWAY,
            Self::Forecast(ForecastError::Superseded)
            | Self::Dashboard(DashboardError::Superseded) => StatusCode::CONFLICT,
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Forecast(ForecastError::Validation(e)) => e.kind(),
            Self::Forecast(ForecastError::Dispatch(_)) => "dispatch_failed",
            Self::Dashboard(DashboardError::AllSourcesUnavailable(_)) => "all_sources_unavailable",
            Self::Forecast(ForecastError::Superseded)
            | Self::Dashboard(DashboardError::Superseded) => "superseded",
        }
    }

    fn body(&self) -> ErrorBody {
        let date = match self {
            Self::Forecast(ForecastError::Dispatch(e)) => e.failed_date(),
            _ => None,
        };
        ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
            date,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self, "Request failed upstream");
        }
        (status, Json(self.body())).into_response()
    }
}
