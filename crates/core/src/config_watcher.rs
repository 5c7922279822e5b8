use crate::config::AppConfig;
use crate::config_loader::ConfigLoader;
use anyhow::Result;
use notify::{Event, RecursiveMode, Watcher};
use std::path::Path;
use tokio::sync::{mpsc, watch};

/// Broadcasts configuration reloads so date bounds and the store directory
/// can change without restarting the server.
pub struct ConfigWatcher {
    tx: watch::Sender<AppConfig>,
}

impl ConfigWatcher {
    /// Creates a new configuration watcher with an initial configuration.
    ///
    /// Returns a tuple of the watcher and a receiver for configuration updates.
    #[must_use]
    pub fn new(initial_config: AppConfig) -> (Self, watch::Receiver<AppConfig>) {
        let (tx, rx) = watch::channel(initial_config);
        (Self { tx }, rx)
    }

    /// Returns another receiver of the same configuration stream.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppConfig> {
        self.tx.subscribe()
    }

    /// Reloads `config_path` and publishes the result if it differs from the current value.
    ///
    /// Returns true if a new configuration was published.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed; the current value is kept.
    pub fn reload(&self, config_path: &str) -> Result<bool> {
        let new_config = ConfigLoader::load_from(config_path)?;
        Ok(self.tx.send_if_modified(|current| {
            if *current == new_config {
                false
            } else {
                *current = new_config;
                true
            }
        }))
    }

    /// Watches the configuration file for changes and broadcasts updates.
    ///
    /// The notify watcher lives inside this future; aborting the task that
    /// runs it drops the watcher and the sender with it.
    ///
    /// # Errors
    ///
    /// Returns an error if file watching cannot be initiated.
    pub async fn watch(self, config_path: &str) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<Event>(16);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if let Ok(event) = res {
                // Runs on notify's own thread; a closed channel means we are shutting down.
                let _ = event_tx.blocking_send(event);
            }
        })?;
        watcher.watch(Path::new(config_path), RecursiveMode::NonRecursive)?;

        while let Some(event) = event_rx.recv().await {
            if event.kind.is_modify() {
                tracing::info!(path = %config_path, "Config file changed, reloading...");
                match self.reload(config_path) {
                    Ok(true) => tracing::info!("Config reloaded successfully"),
                    Ok(false) => tracing::debug!("Config unchanged after reload"),
                    Err(e) => tracing::error!("Failed to reload config: {}", e),
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reload_publishes_changed_config() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[forecast]\nmax_in_flight = 4").unwrap();

        let (watcher, rx) = ConfigWatcher::new(AppConfig::default());
        let path = file.path().to_str().unwrap().to_string();

        assert!(watcher.reload(&path).unwrap());
        assert_eq!(rx.borrow().forecast.max_in_flight, 4);

        // Same content again is not a change
        assert!(!watcher.reload(&path).unwrap());
    }

    #[test]
    fn test_reload_keeps_current_value_on_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[forecast\n").unwrap();

        let (watcher, rx) = ConfigWatcher::new(AppConfig::default());
        assert!(watcher.reload(file.path().to_str().unwrap()).is_err());
        assert_eq!(*rx.borrow(), AppConfig::default());
    }

    #[test]
    fn test_reload_keeps_current_value_on_inverted_bounds() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[forecast.bounds]\nstart = \"2015-09-01\"\nend = \"2015-08-01\""
        )
        .unwrap();

        let (watcher, rx) = ConfigWatcher::new(AppConfig::default());
        assert!(watcher.reload(file.path().to_str().unwrap()).is_err());
        assert_eq!(rx.borrow().forecast.bounds, AppConfig::default().forecast.bounds);
    }

    #[tokio::test]
    async fn test_watch_publishes_file_changes() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[forecast]\nmax_in_flight = 4").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let (watcher, mut rx) = ConfigWatcher::new(AppConfig::default());
        let handle = tokio::spawn(async move { watcher.watch(&path).await });
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;

        std::fs::write(file.path(), "[forecast]\nmax_in_flight = 2\n").unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(5), rx.changed())
            .await
            .expect("no reload within 5s")
            .unwrap();
        assert_eq!(rx.borrow().forecast.max_in_flight, 2);
        handle.abort();
    }

    #[tokio::test]
    async fn test_aborting_watch_releases_the_watcher() {
        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let (watcher, mut rx) = ConfigWatcher::new(AppConfig::default());
        let handle = tokio::spawn(async move { watcher.watch(&path).await });
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        handle.abort();
        assert!(handle.await.unwrap_err().is_cancelled());

        // The sender went down with the task, so the stream ends.
        let closed = tokio::time::timeout(std::time::Duration::from_secs(1), rx.changed())
            .await
            .expect("watcher still alive after abort");
        assert!(closed.is_err());
    }
}
