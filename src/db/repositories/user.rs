//! User repository
//!
//! Database operations for staff accounts.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::User;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::Row;
use std::sync::Arc;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a new user
    async fn create(&self, user: &User) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Get user by email (case-insensitive)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Count all users
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }

    async fn fetch_one_where(&self, clause: &str, arg: UserKey<'_>) -> Result<Option<User>> {
        let sql = format!(
            "SELECT id, email, password_hash, created_at FROM users WHERE {}",
            clause
        );
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let query = sqlx::query(&sql);
                let query = match arg {
                    UserKey::Id(id) => query.bind(id),
                    UserKey::Email(email) => query.bind(email),
                };
                let row = query
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get user")?;
                Ok(row.map(|row| User {
                    id: row.get("id"),
                    email: row.get("email"),
                    password_hash: row.get("password_hash"),
                    created_at: row.get("created_at"),
                }))
            }
            DatabaseDriver::Mysql => {
                let query = sqlx::query(&sql);
                let query = match arg {
                    UserKey::Id(id) => query.bind(id),
                    UserKey::Email(email) => query.bind(email),
                };
                let row = query
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get user")?;
                Ok(row.map(|row| User {
                    id: row.get("id"),
                    email: row.get("email"),
                    password_hash: row.get("password_hash"),
                    created_at: row.get("created_at"),
                }))
            }
        }
    }
}

enum UserKey<'a> {
    Id(i64),
    Email(&'a str),
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: &User) -> Result<User> {
        let sql = "INSERT INTO users (email, password_hash, created_at) VALUES (?, ?, ?)";
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(user.created_at)
                .execute(self.pool.sqlite()?)
                .await
                .context("Failed to create user")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(&user.email)
                .bind(&user.password_hash)
                .bind(user.created_at)
                .execute(self.pool.mysql()?)
                .await
                .context("Failed to create user")?
                .last_insert_id() as i64,
        };

        Ok(User {
            id,
            ..user.clone()
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        self.fetch_one_where("id = ?", UserKey::Id(id)).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_one_where("LOWER(email) = LOWER(?)", UserKey::Email(email))
            .await
    }

    async fn count(&self) -> Result<i64> {
        let sql = "SELECT COUNT(*) AS count FROM users";
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to count users")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to count users")?
                .get("count"),
        };
        Ok(count)
    }
}
