//! Client for the per-day prediction service.
//!
//! # Example
//!
//! ```ignore
//! use sales_forecast_client::PredictionClient;
//! use sales_forecast_core::{PredictionService, PredictionServiceConfig, StoreId};
//!
//! let client = PredictionClient::new(&PredictionServiceConfig::default())?;
//! let store = StoreId::new("7").unwrap();
//! let day = client.predict(&store, "2015-08-01".parse()?).await?;
//! println!("{} {}", day.status, day.sales);
//! ```

use crate::error::{ClientError, Result};
use crate::transport::HttpTransport;
use crate::wire::{PredictRequest, RawPrediction};
use async_trait::async_trait;
use sales_forecast_core::{
    DatePoint, PredictedDay, PredictionService, PredictionServiceConfig, ServiceError, StoreId,
};
use std::time::Duration;

/// HTTP client for `POST {base_url}{predict_path}`.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    transport: HttpTransport,
    predict_path: String,
    model_type: String,
}

impl PredictionClient {
    /// Creates a client from the service configuration.
    ///
    /// # Errors
    /// Returns error if the configuration is unusable.
    pub fn new(config: &PredictionServiceConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            config.requests_per_second,
        )?;

        Ok(Self {
            transport,
            predict_path: config.predict_path.clone(),
            model_type: config.model_type.clone(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Requests and validates the prediction for one store-day.
    ///
    /// # Errors
    /// Returns error on transport failure, non-success status, or an invalid payload.
    pub async fn predict_day(&self, store: &StoreId, date: DatePoint) -> Result<PredictedDay> {
        let request = PredictRequest {
            store_id: store.as_str(),
            date,
            model_type: &self.model_type,
        };

        let raw: RawPrediction = self.transport.post(&self.predict_path, &request).await?;
        let day = raw.validate().map_err(ClientError::invalid_payload)?;

        tracing::trace!(
            store = %store,
            %date,
            sales = %day.sales,
            status = %day.status,
            "Prediction received"
        );
        Ok(day)
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn predict(
        &self,
        store: &StoreId,
        date: DatePoint,
    ) -> std::result::Result<PredictedDay, ServiceError> {
        self.predict_day(store, date).await.map_err(ServiceError::from)
    }
}
