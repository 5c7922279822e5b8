//! Forecast orchestration.
//!
//! Expands a query into days, fans the per-day prediction calls out with a
//! bounded number in flight, folds the settled batch into a summary, and
//! publishes only the outcome of the most recent query. The dashboard is
//! loaded the same way, one call per independent source.

pub mod dashboard;
pub mod dispatcher;
pub mod engine;
pub mod view;

#[cfg(test)]
mod testing;

pub use dashboard::DashboardAggregator;
pub use dispatcher::{DispatchSettings, Dispatcher};
pub use engine::ForecastEngine;
pub use view::{LatestView, QueryToken, QueryTracker, ViewState};
