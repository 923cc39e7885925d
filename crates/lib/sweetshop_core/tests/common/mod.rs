//! Shared test support: ephemeral PostgreSQL + migrated pool.

use sqlx::PgPool;
use sweetshop_core::db::{DbError, LocalDbManager};

/// Spin up an ephemeral PostgreSQL instance and run migrations.
///
/// Returns `None` (skipping the test) when PostgreSQL is not installed on
/// the machine; panics on any other failure.
pub async fn migrated_pool() -> Option<(LocalDbManager, PgPool)> {
    let mut db = match LocalDbManager::ephemeral().await {
        Ok(db) => db,
        Err(DbError::PgConfigNotFound) => {
            eprintln!("skipping: pg_config not on PATH");
            return None;
        }
        Err(e) => panic!("ephemeral PostgreSQL: {e}"),
    };
    db.setup().await.expect("db setup");
    db.start().await.expect("db start");

    let pool = PgPool::connect(&db.connection_url())
        .await
        .expect("connect to ephemeral PG");
    sweetshop_core::migrate::migrate(&pool)
        .await
        .expect("run migrations");

    Some((db, pool))
}
