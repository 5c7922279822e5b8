//! Forecast command: one query against the prediction service, printed as a table.

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;
use sales_forecast_core::{ForecastQuery, ForecastSummary, DEFAULT_CONFIG_PATH};
use tokio::sync::watch;

#[derive(Args, Debug, Clone)]
pub struct ForecastArgs {
    /// Store identifier (e.g. "7")
    #[arg(short, long)]
    pub store: String,

    /// First day, YYYY-MM-DD
    #[arg(long)]
    pub start: String,

    /// Last day (inclusive), YYYY-MM-DD
    #[arg(long)]
    pub end: String,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Runs the forecast and prints the summary.
///
/// # Errors
/// Returns an error if the query is invalid or any prediction call fails.
pub async fn run_forecast(args: ForecastArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let (_tx, rx) = watch::channel(config);
    let engine = super::build_engine(rx)?;

    let query = ForecastQuery::parse(
        Some(args.store.as_str()),
        Some(args.start.as_str()),
        Some(args.end.as_str()),
    )?;
    let summary = engine.forecast(&query).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&args.store, &summary);
    }
    Ok(())
}

fn print_summary(store: &str, summary: &ForecastSummary) {
    println!("Store {store}: {} day(s)", summary.days);
    println!();
    println!("{:<12} {:<8} {:>12}", "DATE", "STATUS", "SALES");
    for point in &summary.series {
        println!(
            "{:<12} {:<8} {:>12}",
            point.date.to_string(),
            point.status.to_string(),
            point.sales.round_dp(2)
        );
    }
    println!();
    println!("Total sales:         {:>12}", summary.total_sales.round_dp(2));
    println!("Avg daily (open):    {:>12}", summary.avg_daily_sales.round_dp(2));
    println!("Trend:               {:>12}", format_trend(summary));
    println!(
        "Open / closed:       {:>12}",
        format!("{} / {}", summary.open_days, summary.closed_days)
    );
    if summary.unknown_days > 0 {
        println!("Unknown days:        {:>12}", summary.unknown_days);
    }
    println!("Promo days:          {:>12}", summary.promo_days);
}

fn format_trend(summary: &ForecastSummary) -> String {
    let sign = if summary.trend > Decimal::ZERO { "+" } else { "" };
    match summary.trend_percentage {
        Some(pct) => format!("{sign}{} ({sign}{}%)", summary.trend.round_dp(2), pct.round_dp(2)),
        None => format!("{sign}{}", summary.trend.round_dp(2)),
    }
}
