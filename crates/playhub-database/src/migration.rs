//! Schema and index provisioning.
//!
//! Runs once at store initialization; a provisioning failure aborts
//! startup instead of leaving the store on a partial schema.

use sqlx::PgPool;
use tracing::info;

use playhub_core::error::{AppError, ErrorKind};

/// Provision the session table and its two lookup indexes.
///
/// Applies any pending migrations from the workspace `migrations/`
/// directory. Idempotent: already-applied migrations are skipped.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Provisioning session schema...");

    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to provision session schema: {e}"),
                e,
            )
        })?;

    info!("Session schema provisioned");
    Ok(())
}
