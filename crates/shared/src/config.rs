//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Remote API client configuration.
    pub api: ApiConfig,
    /// View cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Remote API client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the persistence API.
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// View cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Default page size for page-accumulated view stores.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Optional capacity bound for the detail cache.
    ///
    /// Unbounded by default: the cache lives for one UI session.
    #[serde(default)]
    pub detail_capacity: Option<u64>,
}

fn default_page_size() -> u32 {
    30
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            detail_capacity: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier:
    /// 1. `.env` file (if present)
    /// 2. `config/default`
    /// 3. `config/{RUN_MODE}` (defaults to `development`)
    /// 4. `FAKTURA__`-prefixed environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FAKTURA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
