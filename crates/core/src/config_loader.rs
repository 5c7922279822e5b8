use crate::config::AppConfig;
use anyhow::{ensure, Result};
use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use std::path::Path;

/// Default location of the TOML configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "config/Config.toml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads application configuration by merging defaults, TOML, environment variables, and JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load() -> Result<AppConfig> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Loads application configuration from a specific TOML file.
    ///
    /// Missing files are skipped, so an absent file yields the defaults
    /// overlaid with `APP_` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a present file cannot be parsed or the result
    /// fails [`ConfigLoader::check`].
    pub fn load_from(path: impl AsRef<Path>) -> Result<AppConfig> {
        let config: AppConfig = Self::base(path.as_ref())
            .merge(Env::prefixed("APP_").split("__"))
            .join(Json::file("config/Config.json"))
            .extract()?;
        Self::check(&config)?;

        tracing::debug!(path = %path.as_ref().display(), "Configuration loaded");
        Ok(config)
    }

    /// Loads application configuration with a specific profile.
    ///
    /// `config/Config.{profile}.toml` is merged over the base file.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration files cannot be read or parsed.
    pub fn load_with_profile(profile: &str) -> Result<AppConfig> {
        let config: AppConfig = Self::base(Path::new(DEFAULT_CONFIG_PATH))
            .merge(Toml::file(format!("config/Config.{profile}.toml")))
            .merge(Env::prefixed("APP_").split("__"))
            .join(Json::file("config/Config.json"))
            .extract()?;
        Self::check(&config)?;

        Ok(config)
    }

    /// Rejects settings no query could run under.
    ///
    /// # Errors
    ///
    /// Returns an error if the date bounds are inverted or the per-call
    /// timeout is zero.
    pub fn check(config: &AppConfig) -> Result<()> {
        let bounds = &config.forecast.bounds;
        ensure!(
            bounds.start <= bounds.end,
            "forecast.bounds.start {} is after forecast.bounds.end {}",
            bounds.start,
            bounds.end
        );
        ensure!(
            config.forecast.call_timeout_ms > 0,
            "forecast.call_timeout_ms must be positive"
        );
        Ok(())
    }

    fn base(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(path))
    }
}
