//! Forecast engine: ties validation, dispatch, aggregation and the latest-query views together.

use crate::dashboard::DashboardAggregator;
use crate::dispatcher::{DispatchSettings, Dispatcher};
use crate::view::{LatestView, QueryToken, ViewState};
use sales_forecast_core::{
    aggregate, expand, AppConfig, DashboardError, DashboardService, DashboardSnapshot, DateBounds,
    ExpandedQuery, ForecastConfig, ForecastError, ForecastQuery, ForecastSummary,
    PredictionService, StoreEntry, ValidationError,
};
use std::sync::Arc;
use tokio::sync::watch;

/// Runs forecast and dashboard queries against the external services.
///
/// Bounds, the store directory and dispatch settings are read from the
/// config channel at the start of every query, so reloads apply to the next
/// query without a restart.
pub struct ForecastEngine {
    config: watch::Receiver<AppConfig>,
    predictions: Arc<dyn PredictionService>,
    dashboard: Arc<dyn DashboardService>,
    forecast_view: LatestView<ForecastSummary>,
    dashboard_view: LatestView<DashboardSnapshot>,
}

impl ForecastEngine {
    pub fn new(
        config: watch::Receiver<AppConfig>,
        predictions: Arc<dyn PredictionService>,
        dashboard: Arc<dyn DashboardService>,
    ) -> Self {
        Self {
            config,
            predictions,
            dashboard,
            forecast_view: LatestView::new(),
            dashboard_view: LatestView::new(),
        }
    }

    /// Builds an engine over a fixed configuration.
    pub fn with_config(
        config: AppConfig,
        predictions: Arc<dyn PredictionService>,
        dashboard: Arc<dyn DashboardService>,
    ) -> Self {
        let (_tx, rx) = watch::channel(config);
        Self::new(rx, predictions, dashboard)
    }

    /// Validates, dispatches and aggregates one forecast query.
    ///
    /// A rejected query returns before taking a token, so it neither
    /// supersedes an in-flight query nor touches the forecast view. A valid
    /// query publishes its outcome only while it is the most recent one.
    ///
    /// # Errors
    /// - `Validation` if the query is rejected before any call
    /// - `Dispatch` if the per-day batch failed
    /// - `Superseded` if a newer query started before this one finished
    pub async fn forecast(&self, query: &ForecastQuery) -> Result<ForecastSummary, ForecastError> {
        let config = self.config.borrow().forecast.clone();
        let expanded = match validate(query, &config) {
            Ok(expanded) => expanded,
            Err(e) => {
                tracing::warn!(error = %e, "Forecast query rejected");
                return Err(e.into());
            }
        };

        let token = self.forecast_view.begin();
        tracing::info!(
            %token,
            store = %expanded.store,
            start = ?expanded.first(),
            end = ?expanded.last(),
            days = expanded.dates.len(),
            "Forecast query started"
        );

        match self.run_forecast(token, &expanded, &config).await {
            Ok(summary) => {
                if self.forecast_view.complete(token, summary.clone()) {
                    tracing::info!(%token, days = summary.days, "Forecast published");
                    Ok(summary)
                } else {
                    tracing::debug!(%token, "Discarding superseded forecast");
                    Err(ForecastError::Superseded)
                }
            }
            Err(ForecastError::Superseded) => {
                tracing::debug!(%token, "Forecast superseded during dispatch");
                Err(ForecastError::Superseded)
            }
            Err(e) => {
                if self.forecast_view.fail(token, e.to_string()) {
                    tracing::warn!(%token, error = %e, "Forecast failed");
                    Err(e)
                } else {
                    tracing::debug!(%token, "Discarding superseded failure");
                    Err(ForecastError::Superseded)
                }
            }
        }
    }

    async fn run_forecast(
        &self,
        token: QueryToken,
        expanded: &ExpandedQuery,
        config: &ForecastConfig,
    ) -> Result<ForecastSummary, ForecastError> {
        let dispatcher = Dispatcher::new(
            Arc::clone(&self.predictions),
            DispatchSettings::from_config(config),
        );
        let predictions = dispatcher.dispatch(&expanded.store, &expanded.dates).await?;

        if !self.forecast_view.is_current(token) {
            return Err(ForecastError::Superseded);
        }
        Ok(aggregate(&predictions))
    }

    /// Loads the dashboard and publishes it if no newer load started meanwhile.
    ///
    /// # Errors
    /// `AllSourcesUnavailable` if every source failed, `Superseded` if a newer load won.
    pub async fn dashboard(&self) -> Result<DashboardSnapshot, DashboardError> {
        let token = self.dashboard_view.begin();
        let aggregator = {
            let config = self.config.borrow();
            DashboardAggregator::from_config(Arc::clone(&self.dashboard), &config)
        };
        tracing::info!(%token, "Dashboard load started");

        match aggregator.load().await {
            Ok(snapshot) => {
                if self.dashboard_view.complete(token, snapshot.clone()) {
                    Ok(snapshot)
                } else {
                    tracing::debug!(%token, "Discarding superseded dashboard");
                    Err(DashboardError::Superseded)
                }
            }
            Err(e) => {
                if self.dashboard_view.fail(token, e.to_string()) {
                    Err(e)
                } else {
                    Err(DashboardError::Superseded)
                }
            }
        }
    }

    #[must_use]
    pub fn latest_forecast(&self) -> ViewState<ForecastSummary> {
        self.forecast_view.current()
    }

    #[must_use]
    pub fn latest_dashboard(&self) -> ViewState<DashboardSnapshot> {
        self.dashboard_view.current()
    }

    #[must_use]
    pub fn subscribe_forecast(&self) -> watch::Receiver<ViewState<ForecastSummary>> {
        self.forecast_view.subscribe()
    }

    #[must_use]
    pub fn subscribe_dashboard(&self) -> watch::Receiver<ViewState<DashboardSnapshot>> {
        self.dashboard_view.subscribe()
    }

    #[must_use]
    pub fn stores(&self) -> Vec<StoreEntry> {
        self.config.borrow().forecast.stores.clone()
    }

    #[must_use]
    pub fn bounds(&self) -> DateBounds {
        self.config.borrow().forecast.bounds
    }

    #[must_use]
    pub fn config(&self) -> AppConfig {
        self.config.borrow().clone()
    }
}

/// Range checks against the configured bounds, then the store directory.
fn validate(
    query: &ForecastQuery,
    config: &ForecastConfig,
) -> Result<ExpandedQuery, ValidationError> {
    let expanded = expand(query, &config.bounds)?;
    if !config.knows_store(expanded.store.as_str()) {
        return Err(ValidationError::UnknownStore(expanded.store.to_string()));
    }
    Ok(expanded)
}
