//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is read with the
//! `FEEDBACK_HUB` prefix and `__` (double underscore) separating nested
//! values.
//!
//! # Example
//!
//! ```no_run
//! use feedback_hub::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Gateway listening on {}", config.server.socket_addr());
//! ```

mod bot;
mod database;
mod error;
mod server;

pub use bot::BotConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::ServerConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (bind address, log filter)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (SQLite pool)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Bot configuration (gateway secret, admins, dialog tuning)
    pub bot: BotConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `FEEDBACK_HUB` prefix
    /// 3. Uses `__` to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `FEEDBACK_HUB__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `FEEDBACK_HUB__BOT__SIGNING_SECRET=...` -> `bot.signing_secret = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FEEDBACK_HUB")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.bot.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("FEEDBACK_HUB__BOT__SIGNING_SECRET", "test-secret");
    }

    fn clear_env() {
        env::remove_var("FEEDBACK_HUB__BOT__SIGNING_SECRET");
        env::remove_var("FEEDBACK_HUB__BOT__ADMIN_IDS");
        env::remove_var("FEEDBACK_HUB__SERVER__PORT");
        env::remove_var("FEEDBACK_HUB__DATABASE__URL");
    }

    #[test]
    fn loads_with_minimal_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.database.url.starts_with("sqlite://"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn reads_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("FEEDBACK_HUB__SERVER__PORT", "3000");
        env::set_var("FEEDBACK_HUB__BOT__ADMIN_IDS", "100,200");
        env::set_var("FEEDBACK_HUB__DATABASE__URL", "sqlite::memory:");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.bot.admin_ids().len(), 2);
        assert_eq!(config.database.url, "sqlite::memory:");
    }

    #[test]
    fn missing_secret_fails_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_err());
    }
}
