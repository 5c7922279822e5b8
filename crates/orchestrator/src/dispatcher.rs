//! Per-day request dispatcher.
//!
//! Issues one prediction call per date, concurrently and bounded by
//! `max_in_flight`, then waits for every call to settle before deciding the
//! batch outcome. Results come back in input order whatever order the calls
//! finish in; each date owns one slot of the result buffer.

use futures_util::stream::{self, StreamExt};
use sales_forecast_core::{
    CallFailure, DatePoint, DayPrediction, DispatchError, FailurePolicy, ForecastConfig,
    PredictedDay, PredictionService, StoreId,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Knobs for one dispatch, taken from the live forecast configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    pub max_in_flight: usize,
    pub call_timeout: Duration,
    pub policy: FailurePolicy,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self::from_config(&ForecastConfig::default())
    }
}

impl DispatchSettings {
    #[must_use]
    pub fn from_config(config: &ForecastConfig) -> Self {
        Self {
            max_in_flight: config.max_in_flight.max(1),
            call_timeout: config.call_timeout(),
            policy: config.failure_policy,
        }
    }
}

type CallOutcome = (DatePoint, Result<PredictedDay, CallFailure>);

pub struct Dispatcher {
    service: Arc<dyn PredictionService>,
    settings: DispatchSettings,
}

impl Dispatcher {
    #[must_use]
    pub fn new(service: Arc<dyn PredictionService>, settings: DispatchSettings) -> Self {
        Self { service, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Predicts every date for `store`.
    ///
    /// # Errors
    /// Under `AllOrNothing`, `PartialFailure` naming the earliest failed date.
    /// Under `Partial`, `AllFailed` only if no call succeeded.
    /// `EmptyBatch` if `dates` is empty.
    pub async fn dispatch(
        &self,
        store: &StoreId,
        dates: &[DatePoint],
    ) -> Result<Vec<DayPrediction>, DispatchError> {
        if dates.is_empty() {
            return Err(DispatchError::EmptyBatch);
        }

        let started = Instant::now();
        tracing::info!(
            store = %store,
            days = dates.len(),
            max_in_flight = self.settings.max_in_flight,
            "Dispatching prediction batch"
        );

        let outcomes = self.fan_out(store, dates).await;

        let result = settle(outcomes, self.settings.policy);
        match &result {
            Ok(days) => tracing::info!(
                store = %store,
                days = days.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Prediction batch complete"
            ),
            Err(e) => tracing::warn!(store = %store, error = %e, "Prediction batch failed"),
        }
        result
    }

    /// Runs every call and returns outcomes in input order.
    async fn fan_out(&self, store: &StoreId, dates: &[DatePoint]) -> Vec<CallOutcome> {
        let service = self.service.as_ref();
        let timeout = self.settings.call_timeout;

        // `buffered` yields in submission order, so completion order never leaks.
        stream::iter(dates.iter().copied())
            .map(|date| async move {
                let result = match tokio::time::timeout(timeout, service.predict(store, date)).await
                {
                    Ok(Ok(day)) => Ok(day),
                    Ok(Err(e)) => Err(CallFailure::from(e)),
                    Err(_) => Err(CallFailure::Timeout(format!(
                        "no response within {timeout:?}"
                    ))),
                };
                if let Err(cause) = &result {
                    tracing::debug!(store = %store, %date, %cause, "Prediction call failed");
                }
                (date, result)
            })
            .buffered(self.settings.max_in_flight)
            .collect::<Vec<_>>()
            .await
    }
}

/// Applies the failure policy to a settled batch.
fn settle(
    outcomes: Vec<CallOutcome>,
    policy: FailurePolicy,
) -> Result<Vec<DayPrediction>, DispatchError> {
    match policy {
        FailurePolicy::AllOrNothing => outcomes
            .into_iter()
            .map(|(date, result)| {
                result
                    .map(|day| DayPrediction::from_service(date, day))
                    .map_err(|cause| DispatchError::PartialFailure { date, cause })
            })
            .collect(),
        FailurePolicy::Partial => {
            let days = outcomes.len();
            if outcomes.iter().all(|(_, r)| r.is_err()) {
                let (first_date, cause) = outcomes
                    .into_iter()
                    .find_map(|(date, r)| r.err().map(|cause| (date, cause)))
                    .ok_or(DispatchError::EmptyBatch)?;
                return Err(DispatchError::AllFailed {
                    days,
                    first_date,
                    cause,
                });
            }

            Ok(outcomes
                .into_iter()
                .map(|(date, result)| match result {
                    Ok(day) => DayPrediction::from_service(date, day),
                    Err(cause) => {
                        tracing::warn!(%date, %cause, "Keeping failed day as unknown");
                        DayPrediction::unknown(date)
                    }
                })
                .collect())
        }
    }
}
