use crate::error::ServiceError;
use crate::types::{
    DatePoint, KpiSet, PeriodSales, PredictedDay, QuarterSales, StoreId, StoreRanking,
    StoreTypeShare,
};
use async_trait::async_trait;

/// Per-day prediction model, reached over the network.
///
/// Implementations validate the payload before returning it.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(&self, store: &StoreId, date: DatePoint) -> Result<PredictedDay, ServiceError>;
}

/// Independent aggregate endpoints behind the dashboard.
#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn kpis(&self) -> Result<KpiSet, ServiceError>;
    async fn top_stores(&self, limit: usize) -> Result<Vec<StoreRanking>, ServiceError>;
    async fn sales_history(&self) -> Result<Vec<PeriodSales>, ServiceError>;
    async fn store_types(&self) -> Result<Vec<StoreTypeShare>, ServiceError>;
    async fn quarterly(&self) -> Result<Vec<QuarterSales>, ServiceError>;
}
