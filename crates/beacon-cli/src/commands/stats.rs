//! Store totals.

use serde::Serialize;

use crate::output::{self, OutputFormat};
use beacon_core::AppResult;
use beacon_database::ChatStore;

#[derive(Debug, Serialize)]
struct StatsReport {
    total_users: u64,
    online_users: u64,
    total_messages: u64,
}

/// Execute the stats command
pub async fn execute(env: &str, format: OutputFormat) -> AppResult<()> {
    let config = super::load_config(env)?;
    let manager = super::connect_store(&config).await?;
    let store = manager.store();

    let report = StatsReport {
        total_users: store.count_users().await?,
        online_users: store.count_online_users().await?,
        total_messages: store.count_messages().await?,
    };

    match format {
        OutputFormat::Table => {
            println!("Store totals:");
            output::print_kv("Users", &report.total_users.to_string());
            output::print_kv("Online (durable flag)", &report.online_users.to_string());
            output::print_kv("Messages", &report.total_messages.to_string());
        }
        OutputFormat::Json => output::print_json(&report),
    }

    Ok(())
}
