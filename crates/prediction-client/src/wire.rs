//! Wire formats of the external services and their validation into domain types.
//!
//! Payloads are loosely typed on the other side of the boundary; everything is
//! checked here so only well-formed values reach the orchestrator. Field
//! aliases accept the Spanish keys (`ventas`, `mes`, ...) the legacy backend
//! still emits.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sales_forecast_core::{
    DayStatus, KpiSet, PeriodSales, PredictedDay, QuarterSales, StoreRanking, StoreTypeShare,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Prediction Service
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub(crate) struct PredictRequest<'a> {
    pub store_id: &'a str,
    pub date: NaiveDate,
    pub model_type: &'a str,
}

/// Boolean that may arrive as `true`/`false` or `1`/`0`.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawFlag {
    Bool(bool),
    Int(i64),
}

impl RawFlag {
    fn as_bool(self, field: &str) -> Result<bool, String> {
        match self {
            Self::Bool(b) => Ok(b),
            Self::Int(0) => Ok(false),
            Self::Int(1) => Ok(true),
            Self::Int(other) => Err(format!("{field} must be 0 or 1, got {other}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPrediction {
    #[serde(alias = "sales", alias = "prediction")]
    pub predicted_sales: Option<Decimal>,
    pub promo: Option<RawFlag>,
    pub status: Option<String>,
    pub open: Option<RawFlag>,
}

impl RawPrediction {
    /// Checks the payload and converts it into a `PredictedDay`.
    ///
    /// `status` wins over `open` when both are present.
    pub fn validate(self) -> Result<PredictedDay, String> {
        let sales = self
            .predicted_sales
            .ok_or_else(|| "missing predicted_sales".to_string())?;
        if sales.is_sign_negative() && !sales.is_zero() {
            return Err(format!("negative predicted_sales: {sales}"));
        }

        let status = match (self.status.as_deref(), self.open) {
            (Some(raw), _) => {
                DayStatus::from_wire(raw).ok_or_else(|| format!("unknown status: {raw:?}"))?
            }
            (None, Some(flag)) => {
                if flag.as_bool("open")? {
                    DayStatus::Open
                } else {
                    DayStatus::Closed
                }
            }
            (None, None) => return Err("missing status".to_string()),
        };

        let promo = match self.promo {
            Some(flag) => flag.as_bool("promo")?,
            None => false,
        };

        Ok(PredictedDay {
            sales,
            promo,
            status,
        })
    }
}

// =============================================================================
// Dashboard Sources
// =============================================================================

fn non_negative(field: &str, value: Decimal) -> Result<Decimal, String> {
    if value.is_sign_negative() && !value.is_zero() {
        Err(format!("negative {field}: {value}"))
    } else {
        Ok(value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawKpis {
    #[serde(alias = "ventas_totales")]
    pub total_sales: Decimal,
    #[serde(alias = "clientes_totales")]
    pub total_customers: u64,
    #[serde(alias = "registros_totales")]
    pub total_records: u64,
    #[serde(alias = "sucursales_activas")]
    pub total_stores: u64,
}

impl RawKpis {
    pub fn validate(self) -> Result<KpiSet, String> {
        Ok(KpiSet {
            total_sales: non_negative("total_sales", self.total_sales)?,
            total_customers: self.total_customers,
            total_records: self.total_records,
            total_stores: self.total_stores,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawStoreRanking {
    pub name: String,
    #[serde(alias = "ventas")]
    pub sales: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawPeriodSales {
    #[serde(alias = "mes", alias = "label")]
    pub period: String,
    #[serde(alias = "ventas")]
    pub sales: Decimal,
    #[serde(default, alias = "clientes")]
    pub customers: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawStoreTypeShare {
    #[serde(alias = "name")]
    pub label: String,
    #[serde(alias = "count", alias = "share")]
    pub value: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawQuarterSales {
    #[serde(alias = "trimestre")]
    pub quarter: String,
    #[serde(alias = "ventas")]
    pub sales: Decimal,
}

pub(crate) fn validate_rankings(raw: Vec<RawStoreRanking>) -> Result<Vec<StoreRanking>, String> {
    raw.into_iter()
        .map(|r| {
            Ok(StoreRanking {
                sales: non_negative("sales", r.sales)?,
                name: r.name,
            })
        })
        .collect()
}

pub(crate) fn validate_history(raw: Vec<RawPeriodSales>) -> Result<Vec<PeriodSales>, String> {
    raw.into_iter()
        .map(|p| {
            Ok(PeriodSales {
                sales: non_negative("sales", p.sales)?,
                period: p.period,
                customers: p.customers,
            })
        })
        .collect()
}

pub(crate) fn validate_store_types(
    raw: Vec<RawStoreTypeShare>,
) -> Result<Vec<StoreTypeShare>, String> {
    raw.into_iter()
        .map(|s| {
            Ok(StoreTypeShare {
                value: non_negative("value", s.value)?,
                label: s.label,
            })
        })
        .collect()
}

pub(crate) fn validate_quarterly(raw: Vec<RawQuarterSales>) -> Result<Vec<QuarterSales>, String> {
    raw.into_iter()
        .map(|q| {
            Ok(QuarterSales {
                sales: non_negative("sales", q.sales)?,
                quarter: q.quarter,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw(json: serde_json::Value) -> RawPrediction {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_request_serializes_iso_date() {
        let request = PredictRequest {
            store_id: "7",
            date: NaiveDate::from_ymd_opt(2015, 8, 1).unwrap(),
            model_type: "xgboost",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["date"], "2015-08-01");
        assert_eq!(json["store_id"], "7");
    }

    #[test]
    fn test_status_takes_precedence_over_open_flag() {
        let day = raw(serde_json::json!({
            "predicted_sales": 5.0,
            "status": "closed",
            "open": 1
        }))
        .validate()
        .unwrap();
        assert_eq!(day.status, DayStatus::Closed);
    }

    #[test]
    fn test_sales_alias_accepted() {
        let day = raw(serde_json::json!({ "sales": 321.25, "status": "OPEN" }))
            .validate()
            .unwrap();
        assert_eq!(day.sales, dec!(321.25));
        assert!(!day.promo);
    }

    #[test]
    fn test_invalid_flag_value() {
        let err = raw(serde_json::json!({
            "predicted_sales": 5.0,
            "status": "open",
            "promo": 2
        }))
        .validate()
        .unwrap_err();
        assert!(err.contains("promo"));
    }

    #[test]
    fn test_missing_status_and_open() {
        let err = raw(serde_json::json!({ "predicted_sales": 5.0 }))
            .validate()
            .unwrap_err();
        assert_eq!(err, "missing status");
    }

    #[test]
    fn test_negative_zero_is_accepted() {
        let day = raw(serde_json::json!({ "predicted_sales": -0.0, "status": "closed" }))
            .validate()
            .unwrap();
        assert!(day.sales.is_zero());
    }

    #[test]
    fn test_spanish_keys_in_history() {
        let rows: Vec<RawPeriodSales> = serde_json::from_value(serde_json::json!([
            { "mes": "Ene", "ventas": 320000, "clientes": 4500 },
            { "mes": "Feb", "ventas": 350000 }
        ]))
        .unwrap();

        let history = validate_history(rows).unwrap();
        assert_eq!(history[0].period, "Ene");
        assert_eq!(history[0].customers, Some(4500));
        assert_eq!(history[1].customers, None);
        assert_eq!(history[1].sales, dec!(350000));
    }

    #[test]
    fn test_negative_ranking_rejected() {
        let rows = vec![RawStoreRanking {
            name: "Sucursal A".to_string(),
            sales: dec!(-1),
        }];
        assert!(validate_rankings(rows).is_err());
    }

    #[test]
    fn test_kpis_validate() {
        let kpis: RawKpis = serde_json::from_value(serde_json::json!({
            "total_sales": 1234567.5,
            "total_customers": 98000,
            "total_records": 1017209,
            "total_stores": 1115
        }))
        .unwrap();
        let kpis = kpis.validate().unwrap();
        assert_eq!(kpis.total_stores, 1115);
        assert_eq!(kpis.total_sales, dec!(1234567.5));
    }
}
