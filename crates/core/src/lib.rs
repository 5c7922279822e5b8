pub mod aggregate;
pub mod config;
pub mod config_loader;
pub mod config_watcher;
pub mod error;
pub mod range;
pub mod traits;
pub mod types;

pub use aggregate::aggregate;
pub use config::{
    AppConfig, DashboardConfig, DateBounds, FailurePolicy, ForecastConfig,
    PredictionServiceConfig, ServerConfig, StoreEntry,
};
pub use config_loader::{ConfigLoader, DEFAULT_CONFIG_PATH};
pub use config_watcher::ConfigWatcher;
pub use error::{
    CallFailure, DashboardError, DispatchError, ForecastError, ServiceError, ValidationError,
};
pub use range::{days_inclusive, expand};
pub use traits::{DashboardService, PredictionService};
pub use types::{
    DashboardSnapshot, DashboardSource, DatePoint, DayPrediction, DayStatus, ExpandedQuery,
    ForecastQuery, ForecastSummary, KpiSet, PeriodSales, PredictedDay, QuarterSales,
    SeriesPoint, SourceOutcome, StoreId, StoreRanking, StoreTypeShare,
};
