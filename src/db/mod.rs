//! Database layer
//!
//! This module provides database abstraction for Newsdesk.
//! It supports:
//! - SQLite (default, for single-binary deployment)
//! - MySQL (for larger deployments)
//!
//! The database driver is selected based on configuration.
//!
//! # Usage
//!
//! ```ignore
//! use newsdesk::config::DatabaseConfig;
//! use newsdesk::db::{create_pool, migrations};
//!
//! let pool = create_pool(&DatabaseConfig::default()).await?;
//! migrations::run_migrations(&pool).await?;
//! pool.ping().await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};

/// Whether a repository error was caused by a unique index rejecting the write.
///
/// Repositories wrap driver errors with `anyhow` context, so the chain is
/// walked until the underlying `sqlx::Error` is found.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| match cause.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_unique_violation(),
        _ => false,
    })
}

/// Whether a repository error was caused by a foreign key pointing at a missing row.
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| match cause.downcast_ref::<sqlx::Error>() {
        Some(sqlx::Error::Database(db_err)) => db_err.is_foreign_key_violation(),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[tokio::test]
    async fn test_is_unique_violation_detects_duplicate_insert() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        pool.execute("CREATE TABLE emails (address TEXT NOT NULL UNIQUE)")
            .await
            .expect("Failed to create table");
        pool.execute("INSERT INTO emails (address) VALUES ('a@news.test')")
            .await
            .expect("Failed to insert");

        let sqlite = pool.sqlite().expect("sqlite pool");
        let err = sqlx::query("INSERT INTO emails (address) VALUES ('a@news.test')")
            .execute(sqlite)
            .await
            .context("Failed to insert email")
            .unwrap_err();

        assert!(is_unique_violation(&err));
        assert!(!is_foreign_key_violation(&err));
    }

    #[tokio::test]
    async fn test_is_foreign_key_violation_detects_dangling_reference() {
        let pool = create_test_pool().await.expect("Failed to create pool");
        pool.execute("CREATE TABLE desks (id INTEGER PRIMARY KEY)")
            .await
            .expect("Failed to create table");
        pool.execute("CREATE TABLE stories (desk_id INTEGER REFERENCES desks(id))")
            .await
            .expect("Failed to create table");

        let sqlite = pool.sqlite().expect("sqlite pool");
        let err = sqlx::query("INSERT INTO stories (desk_id) VALUES (42)")
            .execute(sqlite)
            .await
            .context("Failed to insert story")
            .unwrap_err();

        assert!(is_foreign_key_violation(&err));
        assert!(!is_unique_violation(&err));
    }

    #[test]
    fn test_is_unique_violation_ignores_other_errors() {
        let err = anyhow::anyhow!("connection reset");
        assert!(!is_unique_violation(&err));

        let err = anyhow::Error::from(sqlx::Error::RowNotFound).context("lookup");
        assert!(!is_unique_violation(&err));
    }
}
