//! Serve command: runs the REST API, optionally reloading config on change.

use anyhow::Result;
use clap::Args;
use sales_forecast_core::{ConfigWatcher, DEFAULT_CONFIG_PATH};
use sales_forecast_web_api::ApiServer;
use std::sync::Arc;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    /// Listen address (defaults to server.host:server.port from config)
    #[arg(short, long)]
    pub addr: Option<String>,

    /// Reload the config file when it changes
    #[arg(long)]
    pub watch: bool,
}

/// Runs the API server until Ctrl+C.
///
/// # Errors
/// Returns an error if the config cannot be loaded or the server fails to start.
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = super::load_config(&args.config)?;
    let addr = args.addr.unwrap_or_else(|| config.server.addr());

    let (watcher, config_rx) = ConfigWatcher::new(config);
    let engine = Arc::new(super::build_engine(config_rx)?);

    let watch_handle = if args.watch {
        let path = args.config.clone();
        tracing::info!(path = %path, "Watching config for changes");
        Some(tokio::spawn(async move {
            if let Err(e) = watcher.watch(&path).await {
                tracing::error!("Config watcher stopped: {}", e);
            }
        }))
    } else {
        None
    };

    let server = ApiServer::new(engine);
    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve(&addr).await {
            tracing::error!("Server error: {}", e);
        }
    });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl+C, shutting down");

    server_handle.abort();
    if let Some(handle) = watch_handle {
        handle.abort();
    }
    Ok(())
}
