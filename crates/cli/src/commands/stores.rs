use anyhow::Result;
use clap::Args;
use sales_forecast_core::DEFAULT_CONFIG_PATH;

#[derive(Args, Debug, Clone)]
pub struct StoresArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Prints the store directory and the valid date range.
///
/// # Errors
/// Returns an error if the config cannot be loaded.
pub fn run_stores(args: &StoresArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let forecast = &config.forecast;

    if args.json {
        let out = serde_json::json!({
            "stores": forecast.stores,
            "bounds": forecast.bounds,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Valid dates: {} to {}",
        forecast.bounds.start, forecast.bounds.end
    );
    if forecast.stores.is_empty() {
        println!("No store directory configured; any store id is accepted.");
        return Ok(());
    }
    println!("{:<8} NAME", "ID");
    for store in &forecast.stores {
        println!("{:<8} {}", store.id, store.name);
    }
    Ok(())
}
