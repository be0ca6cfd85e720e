// Configuration module

mod models;

pub use models::*;

use crate::error::{Error, Result};
use config::{Config, Environment, File};
use std::path::PathBuf;

impl Settings {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    pub fn load() -> Result<Self> {
        let config = Config::builder()
            // Start with defaults
            .add_source(Config::try_from(&Self::default())?)
            // Load from config file if it exists
            .add_source(File::with_name(&Self::default_config_path()).required(false))
            // Override with environment variables (prefix: CACHEWISE_)
            .add_source(Environment::with_prefix("CACHEWISE").separator("_"))
            .build()
            .map_err(|e| Error::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| Error::Config(e.to_string()))
    }

    fn default_config_path() -> String {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cachewise")
            .join("config.toml")
            .to_string_lossy()
            .to_string()
    }
}
