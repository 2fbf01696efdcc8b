//! # Database Migrations
//!
//! Embedded SQL migrations creating the document tables and their UNIQUE
//! indexes.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql`
//! 3. Write idempotent SQL (use `IF NOT EXISTS` where possible)
//! 4. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::{DbError, DbResult};

/// Migrations from `migrations/sqlite`, embedded at compile time.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Idempotent; each migration runs in its own transaction.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
///
/// A database that was never migrated reports zero applied.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let tracked: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;

    if tracked == 0 {
        return Ok((total, 0));
    }

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    let applied = usize::try_from(applied)
        .map_err(|e| DbError::Internal(format!("Invalid migration count {}: {}", applied, e)))?;

    Ok((total, applied))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use std::sync::Arc;
    use storefront_core::ModelRegistry;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = Database::new(DbConfig::in_memory(), Arc::new(ModelRegistry::new()))
            .await
            .unwrap();

        db.run_migrations().await.unwrap();

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[tokio::test]
    async fn test_status_of_unmigrated_database() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();

        let (total, applied) = migration_status(&pool).await.unwrap();
        assert!(total >= 1);
        assert_eq!(applied, 0);
    }

    #[tokio::test]
    async fn test_status_reports_query_failures() {
        let db = Database::new(DbConfig::in_memory(), Arc::new(ModelRegistry::new()))
            .await
            .unwrap();
        let pool = db.pool().clone();
        db.close().await;

        assert!(migration_status(&pool).await.is_err());
    }
}
