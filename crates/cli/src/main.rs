use clap::{Parser, Subcommand};

mod commands;

use commands::{DashboardArgs, ForecastArgs, ServeArgs, StoresArgs};

#[derive(Parser)]
#[command(name = "sales-forecast")]
#[command(about = "Daily sales forecasts and dashboard aggregates per store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web API server
    Serve(ServeArgs),
    /// Forecast one store over a date range
    Forecast(ForecastArgs),
    /// Load and print the dashboard aggregates
    Dashboard(DashboardArgs),
    /// List configured stores and the valid date range
    Stores(StoresArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Forecast(args) => commands::run_forecast(args).await?,
        Commands::Dashboard(args) => commands::run_dashboard(args).await?,
        Commands::Stores(args) => commands::run_stores(&args)?,
    }

    Ok(())
}
