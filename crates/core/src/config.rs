use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub forecast: ForecastConfig,
    pub prediction: PredictionServiceConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Closed interval of calendar dates the prediction service has data for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateBounds {
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateBounds {
    fn default() -> Self {
        // Test window of the dataset the shipped model was trained against.
        Self {
            start: NaiveDate::from_ymd_opt(2015, 8, 1).unwrap_or(NaiveDate::MIN),
            end: NaiveDate::from_ymd_opt(2015, 9, 17).unwrap_or(NaiveDate::MAX),
        }
    }
}

/// A store known to the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    pub id: String,
    pub name: String,
}

/// What the dispatcher does when some per-day calls fail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Any failed day fails the whole batch.
    #[default]
    AllOrNothing,
    /// Failed days are kept as `Unknown` and the batch fails only if every day failed.
    Partial,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub bounds: DateBounds,
    pub stores: Vec<StoreEntry>,
    pub failure_policy: FailurePolicy,
    /// Upper bound on concurrent calls within one batch.
    pub max_in_flight: usize,
    /// Per-call timeout applied by the dispatcher and dashboard aggregator.
    pub call_timeout_ms: u64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            bounds: DateBounds::default(),
            stores: Vec::new(),
            failure_policy: FailurePolicy::AllOrNothing,
            max_in_flight: 16,
            call_timeout_ms: 10_000,
        }
    }
}

impl ForecastConfig {
    #[must_use]
    pub const fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    /// Returns true if the store is listed, or if no directory is configured.
    #[must_use]
    pub fn knows_store(&self, store_id: &str) -> bool {
        self.stores.is_empty() || self.stores.iter().any(|s| s.id == store_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionServiceConfig {
    pub base_url: String,
    pub predict_path: String,
    pub model_type: String,
    pub timeout_secs: u64,
    pub requests_per_second: u32,
}

impl Default for PredictionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            predict_path: "/api/v1/predict".to_string(),
            model_type: "xgboost".to_string(),
            timeout_secs: 30,
            requests_per_second: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub base_url: String,
    pub kpis_path: String,
    pub top_stores_path: String,
    pub sales_history_path: String,
    pub store_types_path: String,
    pub quarterly_path: String,
    pub top_n: usize,
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            kpis_path: "/api/v1/dashboard/kpis".to_string(),
            top_stores_path: "/api/v1/dashboard/top-stores".to_string(),
            sales_history_path: "/api/v1/dashboard/sales-history".to_string(),
            store_types_path: "/api/v1/dashboard/store-types".to_string(),
            quarterly_path: "/api/v1/dashboard/quarterly".to_string(),
            top_n: 5,
            timeout_secs: 30,
        }
    }
}
