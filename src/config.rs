// Settings loaded with the 'config' crate: defaults, optional config.toml, then APP_* env vars

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_address: String,
    // Public origin of the site; navigation targets must stay on it
    pub base_url: String,
    pub catalog_path: String,
    pub suggestion_limit: usize,
    pub per_page: usize,
    // Full click records kept in memory; older ones are dropped
    pub click_log_capacity: usize,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Self::defaults(Config::builder())?
            .add_source(File::with_name("config").required(false))
            // e.g. APP_CATALOG_PATH, APP_SUGGESTION_LIMIT
            .add_source(Environment::with_prefix("APP").try_parsing(true));

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.base_url().context("Invalid base_url in configuration")?;
        Ok(settings)
    }

    fn defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(builder
            .set_default("server_address", "127.0.0.1:3000")?
            .set_default("base_url", "http://127.0.0.1:3000")?
            .set_default("catalog_path", "catalog.json")?
            .set_default("suggestion_limit", 10)?
            .set_default("per_page", 10)?
            .set_default("click_log_capacity", 10_000)?)
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.base_url).with_context(|| format!("Cannot parse '{}'", self.base_url))
    }
}

#[cfg(test)]
impl Default for Settings {
    fn default() -> Self {
        Self {
            server_address: "127.0.0.1:3000".to_string(),
            base_url: "http://127.0.0.1:3000".to_string(),
            catalog_path: "catalog.json".to_string(),
            suggestion_limit: 10,
            per_page: 10,
            click_log_capacity: 100,
        }
    }
}
