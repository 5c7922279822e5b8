//! HTTP clients for the external services behind the forecast engine.
//!
//! This crate provides:
//! - `PredictionClient`: per-day sales prediction (`POST /api/v1/predict`)
//! - `DashboardClient`: the five dashboard aggregate endpoints
//! - Boundary validation that turns loosely typed JSON into domain types
//!
//! Both clients implement the service traits from `sales-forecast-core`, so
//! the orchestrator never sees raw payloads. Requests are rate limited with
//! `governor` and bounded by the configured HTTP timeout.
//!
//! # Wire format
//!
//! Prediction request:
//!
//! ```json
//! { "store_id": "7", "date": "2015-08-01", "model_type": "xgboost" }
//! ```
//!
//! Prediction response (`status` may be replaced by a numeric `open` flag):
//!
//! ```json
//! { "predicted_sales": 5263.0, "promo": true, "status": "open" }
//! ```

pub mod dashboard;
pub mod error;
pub mod prediction;
pub mod transport;
mod wire;

pub use dashboard::DashboardClient;
pub use error::{ClientError, Result};
pub use prediction::PredictionClient;
pub use transport::HttpTransport;
