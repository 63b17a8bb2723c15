//! Schema migrations embedded from the workspace `migrations/` directory.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use orgguard_core::error::{AppError, ErrorKind};
use orgguard_core::result::AppResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to date. Already-applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    info!(known = MIGRATOR.iter().count(), "Applying schema migrations");

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Internal,
            format!("Schema migration failed: {e}"),
            e,
        )
    })?;

    info!("Schema is up to date");
    Ok(())
}
