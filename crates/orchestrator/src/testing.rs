//! In-process fakes of the external services.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sales_forecast_core::{
    DashboardService, DatePoint, DayStatus, KpiSet, PeriodSales, PredictedDay, PredictionService,
    QuarterSales, ServiceError, StoreId, StoreRanking, StoreTypeShare,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Day `d` of August 2015.
pub fn date(d: u32) -> DatePoint {
    NaiveDate::from_ymd_opt(2015, 8, d).unwrap()
}

#[derive(Debug, Clone)]
pub enum Reply {
    Day(PredictedDay),
    Fail(ServiceError),
    Delayed(u64, Box<Reply>),
}

impl Reply {
    pub fn open(sales: Decimal) -> Self {
        Self::Day(PredictedDay {
            sales,
            promo: false,
            status: DayStatus::Open,
        })
    }

    pub fn promo(sales: Decimal) -> Self {
        Self::Day(PredictedDay {
            sales,
            promo: true,
            status: DayStatus::Open,
        })
    }

    pub fn closed() -> Self {
        Self::Day(PredictedDay {
            sales: Decimal::ZERO,
            promo: false,
            status: DayStatus::Closed,
        })
    }

    pub fn delayed(self, millis: u64) -> Self {
        Self::Delayed(millis, Box::new(self))
    }
}

/// Answers per date from a script, counting calls and peak concurrency.
#[derive(Debug, Default)]
pub struct FakePredictionService {
    replies: Mutex<HashMap<DatePoint, Reply>>,
    fallback: Option<Reply>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl FakePredictionService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(reply: Reply) -> Self {
        Self {
            fallback: Some(reply),
            ..Self::default()
        }
    }

    pub fn set(&self, date: DatePoint, reply: Reply) {
        self.replies.lock().unwrap().insert(date, reply);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_concurrent(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn reply_for(&self, date: DatePoint) -> Reply {
        self.replies
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .or_else(|| self.fallback.clone())
            .unwrap_or_else(|| Reply::Fail(ServiceError::api(404, format!("no reply for {date}"))))
    }
}

#[async_trait]
impl PredictionService for FakePredictionService {
    async fn predict(
        &self,
        _store: &StoreId,
        date: DatePoint,
    ) -> Result<PredictedDay, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let mut reply = self.reply_for(date);
        while let Reply::Delayed(millis, inner) = reply {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            reply = *inner;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match reply {
            Reply::Day(day) => Ok(day),
            Reply::Fail(e) => Err(e),
            Reply::Delayed(..) => unreachable!(),
        }
    }
}

/// Dashboard sources with fixed answers and an optional shared delay.
#[derive(Debug, Clone)]
pub struct FakeDashboardService {
    pub kpis: Result<KpiSet, ServiceError>,
    pub top_stores: Result<Vec<StoreRanking>, ServiceError>,
    pub sales_history: Result<Vec<PeriodSales>, ServiceError>,
    pub store_types: Result<Vec<StoreTypeShare>, ServiceError>,
    pub quarterly: Result<Vec<QuarterSales>, ServiceError>,
    pub delay: Duration,
}

impl FakeDashboardService {
    pub fn healthy() -> Self {
        Self {
            kpis: Ok(KpiSet {
                total_sales: Decimal::from(1_000_000),
                total_customers: 98_000,
                total_records: 1_017_209,
                total_stores: 1_115,
            }),
            top_stores: Ok(vec![
                ranking("Sucursal Sur", 380_000),
                ranking("Sucursal Central", 450_000),
                ranking("Sucursal Norte", 250_000),
            ]),
            sales_history: Ok(vec![PeriodSales {
                period: "Ene".to_string(),
                sales: Decimal::from(320_000),
                customers: Some(4_500),
            }]),
            store_types: Ok(vec![StoreTypeShare {
                label: "Tipo A".to_string(),
                value: Decimal::from(45),
            }]),
            quarterly: Ok(vec![QuarterSales {
                quarter: "Q1".to_string(),
                sales: Decimal::from(1_050_000),
            }]),
            delay: Duration::ZERO,
        }
    }

    pub fn down() -> Self {
        let err = || ServiceError::Network("connection refused".to_string());
        Self {
            kpis: Err(err()),
            top_stores: Err(err()),
            sales_history: Err(err()),
            store_types: Err(err()),
            quarterly: Err(err()),
            delay: Duration::ZERO,
        }
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

pub fn ranking(name: &str, sales: i64) -> StoreRanking {
    StoreRanking {
        name: name.to_string(),
        sales: Decimal::from(sales),
    }
}

#[async_trait]
impl DashboardService for FakeDashboardService {
    async fn kpis(&self) -> Result<KpiSet, ServiceError> {
        self.pause().await;
        self.kpis.clone()
    }

    async fn top_stores(&self, _limit: usize) -> Result<Vec<StoreRanking>, ServiceError> {
        self.pause().await;
        self.top_stores.clone()
    }

    async fn sales_history(&self) -> Result<Vec<PeriodSales>, ServiceError> {
        self.pause().await;
        self.sales_history.clone()
    }

    async fn store_types(&self) -> Result<Vec<StoreTypeShare>, ServiceError> {
        self.pause().await;
        self.store_types.clone()
    }

    async fn quarterly(&self) -> Result<Vec<QuarterSales>, ServiceError> {
        self.pause().await;
        self.quarterly.clone()
    }
}
