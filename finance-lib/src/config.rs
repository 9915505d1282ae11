use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{env, fs};
use tracing::level_filters::LevelFilter;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";
const DEFAULT_MAX_POOL_SIZE: u32 = 10;

#[derive(Deserialize, Debug, PartialEq)]
pub struct SSLConfig {
    pub private_key_file: PathBuf,
    pub certificate_chain_file: PathBuf,
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct HoneycombConfig {
    pub api_key: String,
}

#[derive(Deserialize, Debug, PartialEq)]
pub struct Config {
    /// Postgres connection string. Expenses are kept in memory when absent.
    pub database_url: Option<String>,
    #[serde(default = "default_max_pool_size")]
    pub max_pool_size: u32,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default)]
    pub log_level: Option<String>,
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
    pub honeycomb: Option<HoneycombConfig>,
    pub ssl: Option<SSLConfig>,
}

fn default_max_pool_size() -> u32 {
    DEFAULT_MAX_POOL_SIZE
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_owned()
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config, anyhow::Error> {
        let config = fs::read_to_string(path)
            .with_context(|| format!("Unable to read config file {}", path.display()))?;
        Self::from_toml(&config)
    }

    pub fn from_toml(config: &str) -> Result<Config, anyhow::Error> {
        toml::from_str(config).context("Unable to parse config")
    }

    pub fn from_env() -> Result<Config, anyhow::Error> {
        let max_pool_size = match read_optional_env("MAX_POOL_SIZE") {
            Some(s) => s.parse().context("Unable to parse MAX_POOL_SIZE value")?,
            None => DEFAULT_MAX_POOL_SIZE,
        };
        let cors_allowed_origins = read_optional_env("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let config = Config {
            database_url: read_optional_env("DATABASE_URL"),
            max_pool_size,
            bind_address: read_optional_env("BIND_ADDRESS").unwrap_or_else(default_bind_address),
            log_level: read_optional_env("LOG_LEVEL"),
            cors_allowed_origins,
            honeycomb: read_optional_env("HONEYCOMB_API_KEY")
                .map(|api_key| HoneycombConfig { api_key }),
            ssl: None,
        };
        Ok(config)
    }

    pub fn level_filter(&self) -> Result<LevelFilter, anyhow::Error> {
        match &self.log_level {
            Some(level) => level
                .parse()
                .with_context(|| format!("Invalid log level {}", level)),
            None => Ok(LevelFilter::INFO),
        }
    }
}

fn read_optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}
