//! Client configuration management.

use serde::Deserialize;
use url::Url;

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Backend API configuration.
    pub api: ApiConfig,
    /// Credential storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Eligibility gate configuration.
    #[serde(default)]
    pub eligibility: EligibilityConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto.
    pub base_url: Url,
    /// User-agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    "lendwise-client/0.1".to_string()
}

/// Credential storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// File holding the persisted session.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            credentials_path: default_credentials_path(),
        }
    }
}

fn default_credentials_path() -> String {
    ".lendwise/credentials.json".to_string()
}

/// Eligibility gate configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EligibilityConfig {
    /// Minimum credit score (inclusive) required to apply for a loan.
    #[serde(default = "default_min_credit_score")]
    pub min_credit_score: u32,
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_credit_score: default_min_credit_score(),
        }
    }
}

fn default_min_credit_score() -> u32 {
    50
}

impl AppConfig {
    /// Loads configuration from `.env`, config files and the environment.
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
            .add_source(config::Environment::with_prefix("LENDWISE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
