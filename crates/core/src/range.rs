//! Date range expansion and query validation.

use crate::config::DateBounds;
use crate::error::ValidationError;
use crate::types::{DatePoint, ExpandedQuery, ForecastQuery};

/// Validates a query against the configured bounds and expands it into
/// one date per calendar day, both endpoints included.
///
/// Checks run in order: store, dates present, bounds, ordering.
///
/// # Errors
/// Returns the first `ValidationError` the query violates.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use sales_forecast_core::{expand, DateBounds, ForecastQuery};
///
/// let d = |day| NaiveDate::from_ymd_opt(2015, 8, day).unwrap();
/// let query = ForecastQuery::new("7", d(1), d(3));
/// let expanded = expand(&query, &DateBounds::new(d(1), d(31))).unwrap();
/// assert_eq!(expanded.dates, vec![d(1), d(2), d(3)]);
/// ```
pub fn expand(
    query: &ForecastQuery,
    bounds: &DateBounds,
) -> Result<ExpandedQuery, ValidationError> {
    let store = query.store.clone().ok_or(ValidationError::MissingStore)?;

    let (start, end) = match (query.start, query.end) {
        (Some(start), Some(end)) => (start, end),
        _ => return Err(ValidationError::MissingDate),
    };

    for date in [start, end] {
        if !bounds.contains(date) {
            return Err(ValidationError::OutOfRange {
                date,
                bounds: *bounds,
            });
        }
    }

    if end < start {
        return Err(ValidationError::InvertedRange { start, end });
    }

    Ok(ExpandedQuery {
        store,
        dates: days_inclusive(start, end),
    })
}

/// Every calendar day from `start` to `end`, inclusive. Empty if `end < start`.
#[must_use]
pub fn days_inclusive(start: DatePoint, end: DatePoint) -> Vec<DatePoint> {
    let count = (end - start).num_days() + 1;
    if count <= 0 {
        return Vec::new();
    }
    start.iter_days().take(count as usize).collect()
}
