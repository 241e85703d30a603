//! Settings repository
//!
//! Key/value store for site-wide settings edited from the admin panel.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;

/// A setting key-value pair
#[derive(Debug, Clone)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Get a single setting by key
    async fn get(&self, key: &str) -> Result<Option<Setting>>;

    /// Get all settings as a map
    async fn get_all(&self) -> Result<HashMap<String, String>>;

    /// Insert or overwrite a single setting
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Insert or overwrite several settings
    async fn set_many(&self, settings: &HashMap<String, String>) -> Result<()> {
        for (key, value) in settings {
            self.set(key, value).await?;
        }
        Ok(())
    }
}

pub struct SqlxSettingsRepository {
    pool: DynDatabasePool,
}

impl SqlxSettingsRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SettingsRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_SETTING: &str = "SELECT `key`, value, updated_at FROM settings WHERE `key` = ?";
const SELECT_ALL_SETTINGS: &str = "SELECT `key`, value FROM settings ORDER BY `key`";

#[async_trait]
impl SettingsRepository for SqlxSettingsRepository {
    async fn get(&self, key: &str) -> Result<Option<Setting>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(SELECT_SETTING)
                    .bind(key)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get setting")?;
                Ok(row.map(|r| Setting {
                    key: r.get("key"),
                    value: r.get("value"),
                    updated_at: r.get("updated_at"),
                }))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(SELECT_SETTING)
                    .bind(key)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get setting")?;
                Ok(row.map(|r| Setting {
                    key: r.get("key"),
                    value: r.get("value"),
                    updated_at: r.get("updated_at"),
                }))
            }
        }
    }

    async fn get_all(&self) -> Result<HashMap<String, String>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(SELECT_ALL_SETTINGS)
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list settings")?;
                Ok(rows.iter().map(|r| (r.get("key"), r.get("value"))).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(SELECT_ALL_SETTINGS)
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list settings")?;
                Ok(rows.iter().map(|r| (r.get("key"), r.get("value"))).collect())
            }
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let result = match self.pool.driver() {
            DatabaseDriver::Sqlite => set_sqlite(self.pool.sqlite()?, key, value).await,
            DatabaseDriver::Mysql => set_mysql(self.pool.mysql()?, key, value).await,
        };
        result.with_context(|| format!("Failed to save setting '{}'", key))
    }
}

async fn set_sqlite(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (`key`, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(`key`) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

async fn set_mysql(pool: &MySqlPool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO settings (`key`, value, updated_at) VALUES (?, ?, ?)
         ON DUPLICATE KEY UPDATE value = VALUES(value), updated_at = VALUES(updated_at)",
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup_test_repo() -> SqlxSettingsRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxSettingsRepository::new(pool)
    }

    #[tokio::test]
    async fn test_seeded_defaults_present() {
        let repo = setup_test_repo().await;
        let all = repo.get_all().await.unwrap();

        assert_eq!(all.get("site_name").map(String::as_str), Some("Newsdesk"));
        assert_eq!(all.get("newsletter_enabled").map(String::as_str), Some("true"));
    }

    #[tokio::test]
    async fn test_set_overwrites_and_inserts() {
        let repo = setup_test_repo().await;

        repo.set("site_name", "Evening Post").await.unwrap();
        repo.set("custom_key", "x").await.unwrap();

        assert_eq!(repo.get("site_name").await.unwrap().unwrap().value, "Evening Post");
        assert_eq!(repo.get("custom_key").await.unwrap().unwrap().value, "x");
        assert!(repo.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_many() {
        let repo = setup_test_repo().await;
        let mut values = HashMap::new();
        values.insert("site_name".to_string(), "Daily Ledger".to_string());
        values.insert("contact_email".to_string(), "tips@ledger.test".to_string());

        repo.set_many(&values).await.unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all["site_name"], "Daily Ledger");
        assert_eq!(all["contact_email"], "tips@ledger.test");
    }
}
