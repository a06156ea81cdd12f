//! Layered configuration.
//!
//! Values are resolved in order: `config/default.toml`, then
//! `config/{env}.toml`, then environment variables prefixed with `BEACON`
//! (double underscore as section separator, e.g. `BEACON__SERVER__PORT`).

pub mod auth;
pub mod database;
pub mod logging;
pub mod realtime;
pub mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use logging::LoggingConfig;
pub use realtime::RealtimeConfig;
pub use server::{CorsConfig, ServerConfig};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::result::AppResult;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration for the named environment.
    pub fn load(env: &str) -> AppResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                Environment::with_prefix("BEACON")
                    .separator("__")
                    .try_parsing(true),
            );

        let settings = builder.build()?;
        Ok(settings.try_deserialize()?)
    }
}
