use config::{Config, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;

use super::error::Result;

/// 环境变量前缀，例如 `S3_BROWSER__PROFILES__ENABLED=true`
pub const ENV_PREFIX: &str = "S3_BROWSER";

// CONFIG static variable. It's actually an AppConfig
// inside an RwLock.
lazy_static! {
    pub static ref CONFIG: RwLock<Config> = RwLock::new(Config::default());
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
    /// 是否同时写入 logs/app.log
    pub file_enabled: bool,
}

/// Connection values used when neither a flag nor a saved profile provides them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub endpoint_uri: Option<String>,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
}

/// Saved connection profiles kept in a document database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilesConfig {
    pub enabled: bool,
    pub url: Option<String>,
    pub database: Option<String>,
    pub collection: String,
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub log: LogConfig,
    pub s3: S3Config,
    pub profiles: ProfilesConfig,
}

impl AppConfig {
    /// Initialize AppConfig.
    pub fn init(default_config: Option<&str>) -> Result<()> {
        let mut builder = Config::builder();

        // Embed file into executable
        // This macro will embed the configuration file into the
        // executable. Check include_str! for more info.
        if let Some(config_contents) = default_config {
            builder = builder.add_source(File::from_str(config_contents, FileFormat::Toml));
        }

        // Merge settings with env variables
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;

        // Save Config to RwLoc
        {
            let mut w = CONFIG.write()?;
            *w = settings;
        }

        Ok(())
    }

    /// Layer a configuration file on top of the current settings.
    /// Environment variables keep the highest priority.
    pub fn merge_config(config_file: Option<&Path>) -> Result<()> {
        if let Some(config_file_path) = config_file {
            let current = CONFIG.read()?.clone();

            let settings = Config::builder()
                .add_source(current)
                .add_source(File::from(config_file_path))
                .add_source(
                    Environment::with_prefix(ENV_PREFIX)
                        .separator("__")
                        .try_parsing(true),
                )
                .build()?;

            let mut w = CONFIG.write()?;
            *w = settings;
        }

        Ok(())
    }

    // Set CONFIG
    pub fn set(key: &str, value: &str) -> Result<()> {
        let current = CONFIG.read()?.clone();

        let settings = Config::builder()
            .add_source(current)
            .set_override(key, value)?
            .build()?;

        let mut w = CONFIG.write()?;
        *w = settings;

        Ok(())
    }

    // Get a single value
    pub fn get<'de, T>(key: &'de str) -> Result<T>
    where
        T: serde::Deserialize<'de>,
    {
        Ok(CONFIG.read()?.get::<T>(key)?)
    }

    // Deserialize the entire configuration into an AppConfig
    pub fn fetch() -> Result<AppConfig> {
        let config_clone = CONFIG.read()?.clone();

        let app_config: AppConfig = config_clone.try_deserialize()?;

        Ok(app_config)
    }
}
