use beacon_core::{AppError, AppResult, ErrorKind};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::prelude::FromRow;
use tracing::info;

/// Applies all pending migrations from the workspace `migrations/`
/// directory.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "database migration failed", e))?;

    info!("database migrations applied");
    Ok(())
}

/// One row of sqlx's bookkeeping table.
#[derive(Debug, Clone, FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub description: String,
    pub installed_on: DateTime<Utc>,
}

/// Lists applied migrations, oldest first. An empty list means the
/// bookkeeping table exists but nothing ran; a missing table is a
/// database error.
pub async fn migration_status(pool: &PgPool) -> AppResult<Vec<AppliedMigration>> {
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, description, installed_on FROM _sqlx_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| AppError::with_source(ErrorKind::Database, "failed to read migration status", e))
}
