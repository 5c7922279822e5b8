//! Dashboard fan-out.
//!
//! The five sources are independent: all are requested at once, each with
//! its own timeout, and a failing source becomes an `Unavailable` marker
//! instead of sinking the whole snapshot.

use sales_forecast_core::{
    AppConfig, DashboardError, DashboardService, DashboardSnapshot, DashboardSource,
    ServiceError, SourceOutcome, StoreRanking,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

pub struct DashboardAggregator {
    service: Arc<dyn DashboardService>,
    top_n: usize,
    call_timeout: Duration,
}

impl DashboardAggregator {
    #[must_use]
    pub fn new(service: Arc<dyn DashboardService>, top_n: usize, call_timeout: Duration) -> Self {
        Self {
            service,
            top_n,
            call_timeout,
        }
    }

    /// Uses `dashboard.top_n` and the shared per-call timeout.
    #[must_use]
    pub fn from_config(service: Arc<dyn DashboardService>, config: &AppConfig) -> Self {
        Self::new(service, config.dashboard.top_n, config.forecast.call_timeout())
    }

    /// Loads every source concurrently.
    ///
    /// # Errors
    /// `AllSourcesUnavailable` if not a single source answered.
    pub async fn load(&self) -> Result<DashboardSnapshot, DashboardError> {
        let service = self.service.as_ref();
        let (kpis, top_stores, sales_history, store_types, quarterly) = tokio::join!(
            self.timed(service.kpis()),
            self.timed(service.top_stores(self.top_n)),
            self.timed(service.sales_history()),
            self.timed(service.store_types()),
            self.timed(service.quarterly()),
        );

        let snapshot = DashboardSnapshot {
            kpis: SourceOutcome::from_result(kpis),
            top_stores: SourceOutcome::from_result(
                top_stores.map(|stores| rank_top(stores, self.top_n)),
            ),
            sales_history: SourceOutcome::from_result(sales_history),
            store_types: SourceOutcome::from_result(store_types),
            quarterly: SourceOutcome::from_result(quarterly),
        };

        let unavailable = snapshot.unavailable_sources();
        if unavailable.len() == DashboardSource::ALL.len() {
            let reason = match &snapshot.kpis {
                SourceOutcome::Unavailable { reason } => reason.clone(),
                SourceOutcome::Available { .. } => String::new(),
            };
            tracing::error!(%reason, "No dashboard source answered");
            return Err(DashboardError::AllSourcesUnavailable(reason));
        }

        if unavailable.is_empty() {
            tracing::info!("Dashboard loaded");
        } else {
            let names: Vec<&str> = unavailable.iter().map(|s| s.as_str()).collect();
            tracing::warn!(unavailable = ?names, "Dashboard loaded with missing sources");
        }
        Ok(snapshot)
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, ServiceError>>,
    ) -> Result<T, ServiceError> {
        tokio::time::timeout(self.call_timeout, call)
            .await
            .unwrap_or_else(|_| {
                Err(ServiceError::Timeout(format!(
                    "no response within {:?}",
                    self.call_timeout
                )))
            })
    }
}

/// Highest sales first, cut to `top_n`. Ties keep source order.
fn rank_top(mut stores: Vec<StoreRanking>, top_n: usize) -> Vec<StoreRanking> {
    stores.sort_by(|a, b| b.sales.cmp(&a.sales));
    stores.truncate(top_n);
    stores
}
