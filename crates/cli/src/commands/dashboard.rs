use anyhow::Result;
use clap::Args;
use sales_forecast_core::{DashboardSnapshot, SourceOutcome, DEFAULT_CONFIG_PATH};
use std::fmt::Display;
use tokio::sync::watch;

#[derive(Args, Debug, Clone)]
pub struct DashboardArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Print the snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

/// Loads every dashboard source and prints what answered.
///
/// # Errors
/// Returns an error if no source answered.
pub async fn run_dashboard(args: DashboardArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let (_tx, rx) = watch::channel(config);
    let engine = super::build_engine(rx)?;

    let snapshot = engine.dashboard().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }
    Ok(())
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    section("KPIs", &snapshot.kpis, |k| {
        vec![
            format!("total sales      {}", k.total_sales),
            format!("total customers  {}", k.total_customers),
            format!("total records    {}", k.total_records),
            format!("total stores     {}", k.total_stores),
        ]
    });
    section("Top stores", &snapshot.top_stores, |rows| {
        rows.iter().map(|r| row(&r.name, r.sales)).collect()
    });
    section("Sales history", &snapshot.sales_history, |rows| {
        rows.iter()
            .map(|r| match r.customers {
                Some(c) => format!("{}  ({c} customers)", row(&r.period, r.sales)),
                None => row(&r.period, r.sales),
            })
            .collect()
    });
    section("Store types", &snapshot.store_types, |rows| {
        rows.iter().map(|r| row(&r.label, r.value)).collect()
    });
    section("Quarterly", &snapshot.quarterly, |rows| {
        rows.iter().map(|r| row(&r.quarter, r.sales)).collect()
    });
}

fn row(label: &str, value: impl Display) -> String {
    format!("{label:<24} {value:>14}")
}

fn section<T>(title: &str, outcome: &SourceOutcome<T>, lines: impl Fn(&T) -> Vec<String>) {
    println!("== {title} ==");
    match outcome {
        SourceOutcome::Available { data } => {
            for line in lines(data) {
                println!("  {line}");
            }
        }
        SourceOutcome::Unavailable { reason } => println!("  unavailable: {reason}"),
    }
    println!();
}
