//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use beacon_auth::PasswordHasher;
use beacon_core::AppResult;
use beacon_database::ChatStore;
use beacon_entity::NewUser;

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users
    List,
    /// Create a user account
    Create {
        /// Username
        username: String,
        /// Email address
        email: String,
        /// Password
        password: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Username
    username: String,
    /// Email
    email: String,
    /// Durable online hint
    online: bool,
    /// Created at
    created_at: String,
}

/// Execute user commands
pub async fn execute(args: &UserArgs, env: &str, format: OutputFormat) -> AppResult<()> {
    let config = super::load_config(env)?;
    let manager = super::connect_store(&config).await?;
    let store = manager.store();

    match &args.command {
        UserCommand::List => {
            let users = store.list_users().await?;
            let rows: Vec<UserRow> = users
                .iter()
                .map(|u| UserRow {
                    id: u.id.to_string(),
                    username: u.username.clone(),
                    email: u.email.clone(),
                    online: u.is_online,
                    created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
                })
                .collect();

            output::print_list(&rows, format);
        }
        UserCommand::Create {
            username,
            email,
            password,
        } => {
            let hasher = PasswordHasher::new();
            let user = store
                .create_user(&NewUser {
                    username: username.clone(),
                    email: email.clone(),
                    password_hash: hasher.hash_password(password)?,
                })
                .await?;

            output::print_success(&format!("User '{}' created ({})", user.username, user.id));
        }
    }

    Ok(())
}
