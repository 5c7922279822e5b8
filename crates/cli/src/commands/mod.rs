//! CLI commands for the sales forecast engine.

pub mod dashboard;
pub mod forecast;
pub mod serve;
pub mod stores;

pub use dashboard::{run_dashboard, DashboardArgs};
pub use forecast::{run_forecast, ForecastArgs};
pub use serve::{run_serve, ServeArgs};
pub use stores::{run_stores, StoresArgs};

use anyhow::{Context, Result};
use sales_forecast_client::{DashboardClient, PredictionClient};
use sales_forecast_core::{AppConfig, ConfigLoader};
use sales_forecast_orchestrator::ForecastEngine;
use std::sync::Arc;
use tokio::sync::watch;

/// Loads the configuration file merged with `APP_` environment overrides.
///
/// # Errors
/// Returns an error if the file exists but cannot be parsed.
pub fn load_config(path: &str) -> Result<AppConfig> {
    if !std::path::Path::new(path).exists() {
        tracing::warn!(path, "Config file not found, using defaults and environment");
    }
    ConfigLoader::load_from(path).with_context(|| format!("failed to load config from {path}"))
}

/// Wires the HTTP clients into an engine following `config`.
///
/// Client endpoints are fixed at construction; bounds, the store directory
/// and dispatch settings follow later updates of the channel.
///
/// # Errors
/// Returns an error if an HTTP client cannot be built.
pub fn build_engine(config: watch::Receiver<AppConfig>) -> Result<ForecastEngine> {
    let (prediction_config, dashboard_config) = {
        let current = config.borrow();
        (current.prediction.clone(), current.dashboard.clone())
    };

    let predictions = PredictionClient::new(&prediction_config)
        .context("failed to build prediction client")?;
    let dashboard =
        DashboardClient::new(&dashboard_config).context("failed to build dashboard client")?;

    tracing::info!(
        prediction_url = %prediction_config.base_url,
        dashboard_url = %dashboard_config.base_url,
        "Engine ready"
    );
    Ok(ForecastEngine::new(
        config,
        Arc::new(predictions),
        Arc::new(dashboard),
    ))
}
