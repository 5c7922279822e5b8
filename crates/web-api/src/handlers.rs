use crate::error::ApiError;
use axum::{extract::State, Json};
use sales_forecast_core::{
    DashboardSnapshot, DateBounds, ForecastQuery, ForecastSummary, StoreEntry,
};
use sales_forecast_orchestrator::{ForecastEngine, ViewState};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct ForecastRequest {
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoresResponse {
    pub stores: Vec<StoreEntry>,
    pub bounds: DateBounds,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Runs a forecast for one store over an inclusive date range.
///
/// # Errors
/// 422 if the query is invalid, 502 if the prediction batch failed,
/// 409 if a newer query superseded this one.
pub async fn forecast(
    State(engine): State<Arc<ForecastEngine>>,
    Json(req): Json<ForecastRequest>,
) -> Result<Json<ForecastSummary>, ApiError> {
    let query = ForecastQuery::parse(
        req.store_id.as_deref(),
        req.start_date.as_deref(),
        req.end_date.as_deref(),
    )?;
    let summary = engine.forecast(&query).await?;
    Ok(Json(summary))
}

/// Returns what the forecast view currently shows.
pub async fn latest_forecast(
    State(engine): State<Arc<ForecastEngine>>,
) -> Json<ViewState<ForecastSummary>> {
    Json(engine.latest_forecast())
}

/// Loads every dashboard source.
///
/// # Errors
/// 502 if no source answered, 409 if a newer load superseded this one.
pub async fn dashboard(
    State(engine): State<Arc<ForecastEngine>>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let snapshot = engine.dashboard().await?;
    Ok(Json(snapshot))
}

pub async fn stores(State(engine): State<Arc<ForecastEngine>>) -> Json<StoresResponse> {
    Json(StoresResponse {
        stores: engine.stores(),
        bounds: engine.bounds(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
