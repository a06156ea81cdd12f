//! CLI command definitions and dispatch.

pub mod migrate;
pub mod serve;
pub mod stats;
pub mod user;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use beacon_core::{AppConfig, AppError, AppResult};
use beacon_database::StoreManager;

/// Beacon — realtime direct-messaging backend
#[derive(Debug, Parser)]
#[command(name = "beacon", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (reads config/<env>.toml plus BEACON_* vars)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Beacon server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Show store totals
    Stats,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.env).await,
            Commands::Migrate(args) => migrate::execute(args, &self.env).await,
            Commands::User(args) => user::execute(args, &self.env, self.format).await,
            Commands::Stats => stats::execute(&self.env, self.format).await,
        }
    }
}

/// Helper: load configuration for the selected environment
pub fn load_config(env: &str) -> AppResult<AppConfig> {
    AppConfig::load(env)
}

/// Helper: connect the configured store backend
pub async fn connect_store(config: &AppConfig) -> AppResult<StoreManager> {
    StoreManager::connect(&config.database).await
}

/// Helper: the Postgres pool, or a clear error for poolless backends
pub fn require_pool(manager: &StoreManager) -> AppResult<&beacon_database::DatabasePool> {
    manager.pool().ok_or_else(|| {
        AppError::configuration("this command requires the postgres database backend")
    })
}
