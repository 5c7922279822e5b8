//! Domain types for forecast queries, per-day predictions, summaries and
//! dashboard snapshots.
//!
//! All sales figures use `rust_decimal::Decimal`. Dates are calendar dates
//! (`chrono::NaiveDate`), never instants.

use crate::error::ValidationError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Query Types
// =============================================================================

/// Opaque store identifier. Never blank once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    /// Creates a store identifier, trimming surrounding whitespace.
    ///
    /// Returns `None` for blank input.
    #[must_use]
    pub fn new(id: impl AsRef<str>) -> Option<Self> {
        let trimmed = id.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A forecast request as submitted by the caller.
///
/// Every field is optional so validation can name what is missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForecastQuery {
    pub store: Option<StoreId>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Calendar date format accepted on the query surface.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

impl ForecastQuery {
    #[must_use]
    pub fn new(store: impl AsRef<str>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            store: StoreId::new(store),
            start: Some(start),
            end: Some(end),
        }
    }

    /// Builds a query from raw text fields.
    ///
    /// Blank strings count as absent; non-blank dates must be `YYYY-MM-DD`.
    ///
    /// # Errors
    /// Returns `ValidationError::InvalidDate` if a date is present but unparseable.
    pub fn parse(
        store: Option<&str>,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            store: store.and_then(StoreId::new),
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map(Some)
            .map_err(|_| ValidationError::InvalidDate(text.to_string())),
    }
}

/// One calendar day of an expanded query.
pub type DatePoint = NaiveDate;

/// A validated query: the store plus its gap-free chronological days.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedQuery {
    pub store: StoreId,
    pub dates: Vec<DatePoint>,
}

impl ExpandedQuery {
    #[must_use]
    pub fn first(&self) -> Option<DatePoint> {
        self.dates.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<DatePoint> {
        self.dates.last().copied()
    }
}

// =============================================================================
// Prediction Types
// =============================================================================

/// Store status on a given day as reported by the prediction service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Open,
    Closed,
    /// The call for this day failed and the partial failure policy kept it.
    Unknown,
}

impl DayStatus {
    /// Parses the status reported by the service. Only `open` and `closed`
    /// are valid wire values.
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "OPEN"),
            Self::Closed => write!(f, "CLOSED"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Validated service answer for one store-day, before it is tied to a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictedDay {
    pub sales: Decimal,
    pub promo: bool,
    pub status: DayStatus,
}

/// Prediction for one day of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPrediction {
    pub date: DatePoint,
    pub sales: Decimal,
    pub promo: bool,
    pub status: DayStatus,
}

impl DayPrediction {
    #[must_use]
    pub const fn from_service(date: DatePoint, day: PredictedDay) -> Self {
        Self {
            date,
            sales: day.sales,
            promo: day.promo,
            status: day.status,
        }
    }

    /// Placeholder for a day whose call failed under the partial policy.
    #[must_use]
    pub const fn unknown(date: DatePoint) -> Self {
        Self {
            date,
            sales: Decimal::ZERO,
            promo: false,
            status: DayStatus::Unknown,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.status == DayStatus::Open
    }
}

// =============================================================================
// Summary Types
// =============================================================================

/// One point of the chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: DatePoint,
    #[serde(with = "rust_decimal::serde::float")]
    pub sales: Decimal,
    pub status: DayStatus,
}

/// Aggregated result of one forecast query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ForecastSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub avg_daily_sales: Decimal,
    pub days: usize,
    pub open_days: usize,
    pub closed_days: usize,
    pub unknown_days: usize,
    pub promo_days: usize,
    #[serde(with = "rust_decimal::serde::float")]
    pub trend: Decimal,
    #[serde(with = "rust_decimal::serde::float_option")]
    pub trend_percentage: Option<Decimal>,
    pub series: Vec<SeriesPoint>,
}

// =============================================================================
// Dashboard Types
// =============================================================================

/// Headline figures across the whole dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KpiSet {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_sales: Decimal,
    pub total_customers: u64,
    pub total_records: u64,
    pub total_stores: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRanking {
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sales: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSales {
    pub period: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sales: Decimal,
    pub customers: Option<u64>,
}

/// Store-type share; `value` is either a count or a percentage, as the source reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreTypeShare {
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterSales {
    pub quarter: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub sales: Decimal,
}

/// Named aggregate endpoints feeding the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSource {
    Kpis,
    TopStores,
    SalesHistory,
    StoreTypes,
    Quarterly,
}

impl DashboardSource {
    pub const ALL: [Self; 5] = [
        Self::Kpis,
        Self::TopStores,
        Self::SalesHistory,
        Self::StoreTypes,
        Self::Quarterly,
    ];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Kpis => "kpis",
            Self::TopStores => "top_stores",
            Self::SalesHistory => "sales_history",
            Self::StoreTypes => "store_types",
            Self::Quarterly => "quarterly",
        }
    }
}

impl fmt::Display for DashboardSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one dashboard source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SourceOutcome<T> {
    Available { data: T },
    Unavailable { reason: String },
}

impl<T> SourceOutcome<T> {
    #[must_use]
    pub fn from_result<E: fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Available { data },
            Err(e) => Self::Unavailable {
                reason: e.to_string(),
            },
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Available { data } => Some(data),
            Self::Unavailable { .. } => None,
        }
    }
}

/// Best-effort composite of every dashboard source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub kpis: SourceOutcome<KpiSet>,
    pub top_stores: SourceOutcome<Vec<StoreRanking>>,
    pub sales_history: SourceOutcome<Vec<PeriodSales>>,
    pub store_types: SourceOutcome<Vec<StoreTypeShare>>,
    pub quarterly: SourceOutcome<Vec<QuarterSales>>,
}

impl DashboardSnapshot {
    /// Sources that could not be loaded, in declaration order.
    #[must_use]
    pub fn unavailable_sources(&self) -> Vec<DashboardSource> {
        let states = [
            (DashboardSource::Kpis, self.kpis.is_available()),
            (DashboardSource::TopStores, self.top_stores.is_available()),
            (DashboardSource::SalesHistory, self.sales_history.is_available()),
            (DashboardSource::StoreTypes, self.store_types.is_available()),
            (DashboardSource::Quarterly, self.quarterly.is_available()),
        ];
        states
            .into_iter()
            .filter(|(_, available)| !available)
            .map(|(source, _)| source)
            .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unavailable_sources().is_empty()
    }
}
