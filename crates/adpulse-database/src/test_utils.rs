//! Test utilities for database integration tests
//!
//! Provides a migrated in-memory SQLite database so crates can run
//! persistence tests without external services.

use crate::DbConnection;
use adpulse_migrations::Migrator;
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Opens a fresh in-memory SQLite database with all migrations applied.
/// Each call returns an isolated database; tests never share state.
///
/// The pool is pinned to a single connection: every pooled connection to
/// `sqlite::memory:` would otherwise open its own empty database.
pub async fn setup_test_db() -> anyhow::Result<Arc<DbConnection>> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1);

    let db = Database::connect(opt).await?;
    Migrator::up(&db, None).await?;
    Ok(Arc::new(db))
}
