//! Application configuration.
//!
//! Typed configuration loaded from environment variables via the `config`
//! and `dotenvy` crates. Variables use the `TEAMSPACE` prefix with `__` as
//! the nesting separator, so `TEAMSPACE__SERVER__PORT=8080` sets
//! `server.port` and `TEAMSPACE__DATABASE__URL=...` sets `database.url`.
//!
//! # Example
//!
//! ```no_run
//! use teamspace::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod database;
mod error;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root configuration for the service.
///
/// Load with [`AppConfig::load()`], then run [`AppConfig::validate()`]
/// before using any of the values.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL settings. `database.url` is the only required value
    /// in the whole configuration.
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Reads a `.env` file first if one is present, then deserializes
    /// everything under the `TEAMSPACE` prefix.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when a required variable is missing or a
    /// value fails to parse into its typed field.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TEAMSPACE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate every configuration section.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
