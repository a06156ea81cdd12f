//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use beacon_core::AppResult;
use beacon_database::migration;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Show applied migrations
    Status,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, env: &str) -> AppResult<()> {
    let config = super::load_config(env)?;
    let manager = super::connect_store(&config).await?;
    let pool = super::require_pool(&manager)?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            migration::run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied.");
        }
        MigrateCommand::Status => {
            let applied = migration::migration_status(pool.pool()).await?;
            if applied.is_empty() {
                println!("No migrations applied yet.");
            }
            for entry in &applied {
                println!(
                    "  {} - {} (applied {})",
                    entry.version,
                    entry.description,
                    entry.installed_on.format("%Y-%m-%d %H:%M")
                );
            }
        }
    }

    Ok(())
}
