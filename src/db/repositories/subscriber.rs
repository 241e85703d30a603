//! Newsletter subscriber repository

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::NewsletterSubscriber;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

#[async_trait]
pub trait SubscriberRepository: Send + Sync {
    /// Insert a subscriber; a duplicate email surfaces as a unique violation
    async fn create(&self, email: &str) -> Result<NewsletterSubscriber>;

    /// All subscribers, newest signup first
    async fn list(&self) -> Result<Vec<NewsletterSubscriber>>;

    /// Delete a subscriber; returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn count(&self) -> Result<i64>;
}

pub struct SqlxSubscriberRepository {
    pool: DynDatabasePool,
}

impl SqlxSubscriberRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SubscriberRepository> {
        Arc::new(Self::new(pool))
    }
}

const LIST_SUBSCRIBERS: &str = r#"
    SELECT id, email, subscribed_at
    FROM newsletter_subscribers
    ORDER BY subscribed_at DESC, id DESC
"#;

#[async_trait]
impl SubscriberRepository for SqlxSubscriberRepository {
    async fn create(&self, email: &str) -> Result<NewsletterSubscriber> {
        let sql = "INSERT INTO newsletter_subscribers (email, subscribed_at) VALUES (?, ?)";
        let now = Utc::now();
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(email)
                .bind(now)
                .execute(self.pool.sqlite()?)
                .await
                .context("Failed to add newsletter subscriber")?
                .last_insert_rowid(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(email)
                .bind(now)
                .execute(self.pool.mysql()?)
                .await
                .context("Failed to add newsletter subscriber")?
                .last_insert_id() as i64,
        };

        Ok(NewsletterSubscriber {
            id,
            email: email.to_string(),
            subscribed_at: now,
        })
    }

    async fn list(&self) -> Result<Vec<NewsletterSubscriber>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(LIST_SUBSCRIBERS)
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list subscribers")?;
                Ok(rows
                    .iter()
                    .map(|row| NewsletterSubscriber {
                        id: row.get("id"),
                        email: row.get("email"),
                        subscribed_at: row.get("subscribed_at"),
                    })
                    .collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(LIST_SUBSCRIBERS)
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list subscribers")?;
                Ok(rows
                    .iter()
                    .map(|row| NewsletterSubscriber {
                        id: row.get("id"),
                        email: row.get("email"),
                        subscribed_at: row.get("subscribed_at"),
                    })
                    .collect())
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let sql = "DELETE FROM newsletter_subscribers WHERE id = ?";
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(id)
                .execute(self.pool.sqlite()?)
                .await
                .context("Failed to delete subscriber")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(id)
                .execute(self.pool.mysql()?)
                .await
                .context("Failed to delete subscriber")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn count(&self) -> Result<i64> {
        let sql = "SELECT COUNT(*) AS count FROM newsletter_subscribers";
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to count subscribers")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to count subscribers")?
                .get("count"),
        };
        Ok(count)
    }
}
