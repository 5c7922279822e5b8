//! Client for the dashboard aggregate endpoints.

use crate::error::{ClientError, Result};
use crate::transport::HttpTransport;
use crate::wire::{
    validate_history, validate_quarterly, validate_rankings, validate_store_types, RawKpis,
    RawPeriodSales, RawQuarterSales, RawStoreRanking, RawStoreTypeShare,
};
use async_trait::async_trait;
use sales_forecast_core::{
    DashboardConfig, DashboardService, KpiSet, PeriodSales, QuarterSales, ServiceError,
    StoreRanking, StoreTypeShare,
};
use std::time::Duration;

/// Dashboard sources rarely need more than a handful of calls per second.
const DASHBOARD_REQUESTS_PER_SECOND: u32 = 20;

/// HTTP client for the five dashboard sources, each at its own configured path.
#[derive(Debug, Clone)]
pub struct DashboardClient {
    transport: HttpTransport,
    paths: DashboardConfig,
}

impl DashboardClient {
    /// Creates a client from the dashboard configuration.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: &DashboardConfig) -> Result<Self> {
        let transport = HttpTransport::new(
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
            DASHBOARD_REQUESTS_PER_SECOND,
        )?;

        Ok(Self {
            transport,
            paths: config.clone(),
        })
    }

    /// Fetches the KPI set.
    ///
    /// # Errors
    /// Returns error if the call fails or the payload is invalid.
    pub async fn get_kpis(&self) -> Result<KpiSet> {
        let raw: RawKpis = self.transport.get(&self.paths.kpis_path).await?;
        raw.validate().map_err(ClientError::invalid_payload)
    }

    /// Fetches the top-store ranking, asking the source for at most `limit` rows.
    ///
    /// # Errors
    /// Returns error if the call fails or the payload is invalid.
    pub async fn get_top_stores(&self, limit: usize) -> Result<Vec<StoreRanking>> {
        let path = format!("{}?limit={}", self.paths.top_stores_path, limit);
        let raw: Vec<RawStoreRanking> = self.transport.get(&path).await?;
        validate_rankings(raw).map_err(ClientError::invalid_payload)
    }

    /// Fetches the historical sales series.
    ///
    /// # Errors
    /// Returns error if the call fails or the payload is invalid.
    pub async fn get_sales_history(&self) -> Result<Vec<PeriodSales>> {
        let raw: Vec<RawPeriodSales> = self.transport.get(&self.paths.sales_history_path).await?;
        validate_history(raw).map_err(ClientError::invalid_payload)
    }

    /// Fetches the store-type distribution.
    ///
    /// # Errors
    /// Returns error if the call fails or the payload is invalid.
    pub async fn get_store_types(&self) -> Result<Vec<StoreTypeShare>> {
        let raw: Vec<RawStoreTypeShare> = self.transport.get(&self.paths.store_types_path).await?;
        validate_store_types(raw).map_err(ClientError::invalid_payload)
    }

    /// Fetches the quarterly rollup.
    ///
    /// # Errors
    /// Returns error if the call fails or the payload is invalid.
    pub async fn get_quarterly(&self) -> Result<Vec<QuarterSales>> {
        let raw: Vec<RawQuarterSales> = self.transport.get(&self.paths.quarterly_path).await?;
        validate_quarterly(raw).map_err(ClientError::invalid_payload)
    }
}

#[async_trait]
impl DashboardService for DashboardClient {
    async fn kpis(&self) -> std::result::Result<KpiSet, ServiceError> {
        Ok(self.get_kpis().await?)
    }

    async fn top_stores(
        &self,
        limit: usize,
    ) -> std::result::Result<Vec<StoreRanking>, ServiceError> {
        Ok(self.get_top_stores(limit).await?)
    }

    async fn sales_history(&self) -> std::result::Result<Vec<PeriodSales>, ServiceError> {
        Ok(self.get_sales_history().await?)
    }

    async fn store_types(&self) -> std::result::Result<Vec<StoreTypeShare>, ServiceError> {
        Ok(self.get_store_types().await?)
    }

    async fn quarterly(&self) -> std::result::Result<Vec<QuarterSales>, ServiceError> {
        Ok(self.get_quarterly().await?)
    }
}
