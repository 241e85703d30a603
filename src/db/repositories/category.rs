//! Category repository
//!
//! Database operations for categories.
//!
//! This module provides:
//! - `CategoryRepository` trait defining the interface for category data access
//! - `SqlxCategoryRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Category;
use crate::services::slug::SlugProbe;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Category repository trait
#[async_trait]
pub trait CategoryRepository: SlugProbe {
    /// Create a new category
    async fn create(&self, category: &Category) -> Result<Category>;

    /// Get category by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Category>>;

    /// Get category by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// List all categories ordered by name
    async fn list(&self) -> Result<Vec<Category>>;

    /// Update name, slug and description of an existing category
    async fn update(&self, category: &Category) -> Result<Category>;

    /// Delete a category; returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count categories
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based category repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxCategoryRepository {
    pool: DynDatabasePool,
}

impl SqlxCategoryRepository {
    /// Create a new SQLx category repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn CategoryRepository> {
        Arc::new(Self::new(pool))
    }
}

const CATEGORY_COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

#[async_trait]
impl SlugProbe for SqlxCategoryRepository {
    async fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let sql = "SELECT COUNT(*) AS count FROM categories WHERE slug = ? AND id <> ?";
        let exclude = exclude_id.unwrap_or(0);
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(slug)
                .bind(exclude)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to check category slug")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(slug)
                .bind(exclude)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to check category slug")?
                .get("count"),
        };
        Ok(count > 0)
    }
}

#[async_trait]
impl CategoryRepository for SqlxCategoryRepository {
    async fn create(&self, category: &Category) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_category_sqlite(self.pool.sqlite()?, category).await,
            DatabaseDriver::Mysql => create_category_mysql(self.pool.mysql()?, category).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE id = ?", CATEGORY_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get category by ID")?;
                Ok(row.as_ref().map(row_to_category_sqlite))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get category by ID")?;
                Ok(row.as_ref().map(row_to_category_mysql))
            }
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE slug = ?", CATEGORY_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(slug)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get category by slug")?;
                Ok(row.as_ref().map(row_to_category_sqlite))
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(slug)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get category by slug")?;
                Ok(row.as_ref().map(row_to_category_mysql))
            }
        }
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let sql = format!("SELECT {} FROM categories ORDER BY name, id", CATEGORY_COLUMNS);
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.sqlite()?)
                    .await
                    .context("Failed to list categories")?;
                Ok(rows.iter().map(row_to_category_sqlite).collect())
            }
            DatabaseDriver::Mysql => {
                let rows = sqlx::query(&sql)
                    .fetch_all(self.pool.mysql()?)
                    .await
                    .context("Failed to list categories")?;
                Ok(rows.iter().map(row_to_category_mysql).collect())
            }
        }
    }

    async fn update(&self, category: &Category) -> Result<Category> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_category_sqlite(self.pool.sqlite()?, category).await?,
            DatabaseDriver::Mysql => update_category_mysql(self.pool.mysql()?, category).await?,
        }
        self.get_by_id(category.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Category not found after update"))
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let sql = "DELETE FROM categories WHERE id = ?";
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(id)
                .execute(self.pool.sqlite()?)
                .await
                .context("Failed to delete category")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(id)
                .execute(self.pool.mysql()?)
                .await
                .context("Failed to delete category")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn count(&self) -> Result<i64> {
        let sql = "SELECT COUNT(*) AS count FROM categories";
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to count categories")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to count categories")?
                .get("count"),
        };
        Ok(count)
    }
}

const INSERT_CATEGORY: &str = r#"
    INSERT INTO categories (name, slug, description, created_at, updated_at)
    VALUES (?, ?, ?, ?, ?)
"#;

const UPDATE_CATEGORY: &str = r#"
    UPDATE categories
    SET name = ?, slug = ?, description = ?, updated_at = ?
    WHERE id = ?
"#;

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_category_sqlite(pool: &SqlitePool, category: &Category) -> Result<Category> {
    let result = sqlx::query(INSERT_CATEGORY)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(pool)
        .await
        .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_rowid(),
        ..category.clone()
    })
}

async fn update_category_sqlite(pool: &SqlitePool, category: &Category) -> Result<()> {
    sqlx::query(UPDATE_CATEGORY)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.updated_at)
        .bind(category.id)
        .execute(pool)
        .await
        .context("Failed to update category")?;

    Ok(())
}

fn row_to_category_sqlite(row: &sqlx::sqlite::SqliteRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_category_mysql(pool: &MySqlPool, category: &Category) -> Result<Category> {
    let result = sqlx::query(INSERT_CATEGORY)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(pool)
        .await
        .context("Failed to create category")?;

    Ok(Category {
        id: result.last_insert_id() as i64,
        ..category.clone()
    })
}

async fn update_category_mysql(pool: &MySqlPool, category: &Category) -> Result<()> {
    sqlx::query(UPDATE_CATEGORY)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.updated_at)
        .bind(category.id)
        .execute(pool)
        .await
        .context("Failed to update category")?;

    Ok(())
}

fn row_to_category_mysql(row: &sqlx::mysql::MySqlRow) -> Category {
    Category {
        id: row.get("id"),
        name: row.get("name"),
        slug: row.get("slug"),
        description: row.get("description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}
