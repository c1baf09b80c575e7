use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub pacing: PacingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL for the sports-data API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.sofascore.com/api/v1".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Maximum connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Fixed delays between external API calls, respecting the implicit rate limit
#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    /// Delay between per-match detail fetches in milliseconds
    #[serde(default = "default_match_delay_ms")]
    pub match_delay_ms: u64,
    /// Delay between per-team cache refresh calls in milliseconds
    #[serde(default = "default_team_delay_ms")]
    pub team_delay_ms: u64,
}

fn default_match_delay_ms() -> u64 {
    1000
}

fn default_team_delay_ms() -> u64 {
    2000
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            match_delay_ms: default_match_delay_ms(),
            team_delay_ms: default_team_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("api.base_url", default_base_url())?
            .set_default("api.timeout_secs", 30)?
            .set_default("database.max_connections", 5)?
            .set_default("pacing.match_delay_ms", 1000)?
            .set_default("pacing.team_delay_ms", 2000)?
            .set_default("logging.level", "info")?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("MATCHDAY_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (MATCHDAY_DATABASE__URL, etc.)
            .add_source(
                Environment::with_prefix("MATCHDAY")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.api.base_url.is_empty() {
            errors.push("api.base_url must not be empty".to_string());
        }

        if self.database.url.is_empty() {
            errors.push("database.url must not be empty".to_string());
        }

        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_empty_database_url() {
        let config = AppConfig {
            api: ApiConfig::default(),
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 5,
            },
            pacing: PacingConfig::default(),
            logging: LoggingConfig::default(),
        };

        let errors = config.validate().unwrap_err();
        assert!(errors.iter().any(|e| e.contains("database.url")));
    }

    #[test]
    fn pacing_defaults_are_nonzero() {
        let pacing = PacingConfig::default();
        assert!(pacing.match_delay_ms > 0);
        assert!(pacing.team_delay_ms > 0);
    }
}
