use crate::handlers;
use axum::{
    routing::{get, post},
    Router,
};
use sales_forecast_orchestrator::ForecastEngine;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ApiServer {
    engine: Arc<ForecastEngine>,
}

impl ApiServer {
    #[must_use]
    pub const fn new(engine: Arc<ForecastEngine>) -> Self {
        Self { engine }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/api/v1/forecast", post(handlers::forecast))
            .route("/api/v1/forecast/latest", get(handlers::latest_forecast))
            .route("/api/v1/dashboard", get(handlers::dashboard))
            .route("/api/v1/stores", get(handlers::stores))
            .route("/api/v1/health", get(handlers::health))
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.engine))
    }

    /// Starts the web server listening on the specified address.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the address or serve requests.
    pub async fn serve(self, addr: &str) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Web API listening on {}", addr);

        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBody;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use sales_forecast_core::{
        AppConfig, DashboardService, DatePoint, DayStatus, KpiSet, PeriodSales, PredictedDay,
        PredictionService, QuarterSales, ServiceError, StoreEntry, StoreId, StoreRanking,
        StoreTypeShare,
    };
    use tower::ServiceExt;

    /// Open every day except Sundays, with sales equal to the day of month times 100.
    struct CalendarPredictions {
        fail_on: Option<DatePoint>,
    }

    #[async_trait]
    impl PredictionService for CalendarPredictions {
        async fn predict(
            &self,
            _store: &StoreId,
            date: DatePoint,
        ) -> Result<PredictedDay, ServiceError> {
            use chrono::Datelike;
            if self.fail_on == Some(date) {
                return Err(ServiceError::Network("connection reset".to_string()));
            }
            if date.weekday() == chrono::Weekday::Sun {
                return Ok(PredictedDay {
                    sales: Decimal::ZERO,
                    promo: false,
                    status: DayStatus::Closed,
                });
            }
            Ok(PredictedDay {
                sales: Decimal::from(date.day() * 100),
                promo: false,
                status: DayStatus::Open,
            })
        }
    }

    struct DownDashboard;

    #[async_trait]
    impl DashboardService for DownDashboard {
        async fn kpis(&self) -> Result<KpiSet, ServiceError> {
            Err(ServiceError::api(503, "unavailable"))
        }
        async fn top_stores(&self, _limit: usize) -> Result<Vec<StoreRanking>, ServiceError> {
            Err(ServiceError::api(503, "unavailable"))
        }
        async fn sales_history(&self) -> Result<Vec<PeriodSales>, ServiceError> {
            Err(ServiceError::api(503, "unavailable"))
        }
        async fn store_types(&self) -> Result<Vec<StoreTypeShare>, ServiceError> {
            Err(ServiceError::api(503, "unavailable"))
        }
        async fn quarterly(&self) -> Result<Vec<QuarterSales>, ServiceError> {
            Err(ServiceError::api(503, "unavailable"))
        }
    }

    fn router(fail_on: Option<DatePoint>) -> Router {
        let mut config = AppConfig::default();
        config.forecast.stores = vec![StoreEntry {
            id: "7".to_string(),
            name: "Sucursal Este".to_string(),
        }];
        let engine = ForecastEngine::with_config(
            config,
            Arc::new(CalendarPredictions { fail_on }),
            Arc::new(DownDashboard),
        );
        ApiServer::new(Arc::new(engine)).router()
    }

    fn post_forecast(body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/v1/forecast")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_forecast_ok() {
        // 2015-08-01 is a Saturday, 2015-08-02 a Sunday.
        let response = router(None)
            .oneshot(post_forecast(serde_json::json!({
                "store_id": "7",
                "start_date": "2015-08-01",
                "end_date": "2015-08-03"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["total_sales"], 400.0);
        assert_eq!(body["avg_daily_sales"], 200.0);
        assert_eq!(body["closed_days"], 1);
        assert_eq!(body["trend"], 200.0);
        assert_eq!(body["series"].as_array().unwrap().len(), 3);
        assert_eq!(body["series"][1]["status"], "CLOSED");
    }

    #[tokio::test]
    async fn test_forecast_validation_is_unprocessable() {
        let response = router(None)
            .oneshot(post_forecast(serde_json::json!({
                "store_id": "7",
                "start_date": "2015-07-31",
                "end_date": "2015-08-03"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: ErrorBody = serde_json::from_value(json(response).await).unwrap();
        assert_eq!(body.error, "out_of_range");
    }

    #[tokio::test]
    async fn test_forecast_missing_store() {
        let response = router(None)
            .oneshot(post_forecast(serde_json::json!({
                "start_date": "2015-08-01",
                "end_date": "2015-08-03"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(response).await["error"], "missing_store");
    }

    #[tokio::test]
    async fn test_forecast_bad_date_text() {
        let response = router(None)
            .oneshot(post_forecast(serde_json::json!({
                "store_id": "7",
                "start_date": "01/08/2015",
                "end_date": "2015-08-03"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json(response).await["error"], "invalid_date");
    }

    #[tokio::test]
    async fn test_forecast_dispatch_failure_is_bad_gateway() {
        let failing = NaiveDate::from_ymd_opt(2015, 8, 4).unwrap();
        let response = router(Some(failing))
            .oneshot(post_forecast(serde_json::json!({
                "store_id": "7",
                "start_date": "2015-08-03",
                "end_date": "2015-08-07"
            })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body: ErrorBody = serde_json::from_value(json(response).await).unwrap();
        assert_eq!(body.error, "dispatch_failed");
        assert_eq!(body.date, Some(failing));
    }

    #[tokio::test]
    async fn test_latest_forecast_starts_idle() {
        let response = router(None)
            .oneshot(get("/api/v1/forecast/latest"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["state"], "idle");
    }

    #[tokio::test]
    async fn test_dashboard_all_down_is_bad_gateway() {
        let response = router(None).oneshot(get("/api/v1/dashboard")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(json(response).await["error"], "all_sources_unavailable");
    }

    #[tokio::test]
    async fn test_stores_lists_directory_and_bounds() {
        let response = router(None).oneshot(get("/api/v1/stores")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(body["stores"][0]["name"], "Sucursal Este");
        assert_eq!(body["bounds"]["start"], "2015-08-01");
        assert_eq!(body["bounds"]["end"], "2015-09-17");
    }

    #[tokio::test]
    async fn test_health() {
        let response = router(None).oneshot(get("/api/v1/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["status"], "ok");
    }
}
