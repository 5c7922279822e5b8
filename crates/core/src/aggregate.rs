//! Folds chronological per-day predictions into a `ForecastSummary`.

use crate::types::{DayPrediction, DayStatus, ForecastSummary, SeriesPoint};
use rust_decimal::Decimal;

/// Aggregates predictions, which must already be in chronological order.
///
/// - total: every day's sales, whatever its status
/// - average: open-day sales over open-day count, zero with no open days
/// - trend: last open day minus first open day, zero with fewer than two
///
/// Sums saturate at `Decimal::MAX`; a percentage that overflows is `None`.
#[must_use]
pub fn aggregate(predictions: &[DayPrediction]) -> ForecastSummary {
    let mut total_sales = Decimal::ZERO;
    let mut open_sales = Decimal::ZERO;
    let mut open_days = 0usize;
    let mut closed_days = 0usize;
    let mut unknown_days = 0usize;
    let mut promo_days = 0usize;
    let mut first_open: Option<Decimal> = None;
    let mut last_open: Option<Decimal> = None;

    for day in predictions {
        total_sales = total_sales.saturating_add(day.sales);
        if day.promo {
            promo_days += 1;
        }
        match day.status {
            DayStatus::Open => {
                open_days += 1;
                open_sales = open_sales.saturating_add(day.sales);
                first_open.get_or_insert(day.sales);
                last_open = Some(day.sales);
            }
            DayStatus::Closed => closed_days += 1,
            DayStatus::Unknown => unknown_days += 1,
        }
    }

    let avg_daily_sales = if open_days == 0 {
        Decimal::ZERO
    } else {
        open_sales / Decimal::from(open_days)
    };

    let (trend, trend_percentage) = match (first_open, last_open) {
        (Some(first), Some(last)) if open_days >= 2 => {
            let trend = last.saturating_sub(first);
            let pct = trend
                .checked_div(first)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .map(|pct| pct.round_dp(2));
            (trend, pct)
        }
        _ => (Decimal::ZERO, None),
    };

    ForecastSummary {
        total_sales,
        avg_daily_sales,
        days: predictions.len(),
        open_days,
        closed_days,
        unknown_days,
        promo_days,
        trend,
        trend_percentage,
        series: predictions
            .iter()
            .map(|day| SeriesPoint {
                date: day.date,
                sales: day.sales,
                status: day.status,
            })
            .collect(),
    }
}
