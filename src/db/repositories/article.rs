//! Article repository
//!
//! Database operations for articles.
//!
//! This module provides:
//! - `ArticleRepository` trait defining the interface for article data access
//! - `SqlxArticleRepository` implementing the trait for SQLite and MySQL
//!
//! Every read joins the owning category so listings can show its name and
//! link without a second round trip.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{Article, CategorySummary};
use crate::services::slug::SlugProbe;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Article repository trait
#[async_trait]
pub trait ArticleRepository: SlugProbe {
    /// Insert a new article and return it with its assigned ID
    async fn create(&self, article: &Article) -> Result<Article>;

    /// Get article by ID regardless of publish state
    async fn get_by_id(&self, id: i64) -> Result<Option<Article>>;

    /// Get article by slug regardless of publish state
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>>;

    /// All articles, newest first by creation time
    async fn list_all(&self) -> Result<Vec<Article>>;

    /// Published articles, newest publication first
    async fn list_published(&self) -> Result<Vec<Article>>;

    /// Published articles in one category, newest publication first
    async fn list_published_by_category(&self, category_id: i64) -> Result<Vec<Article>>;

    /// Most recently created articles
    async fn recent(&self, limit: i64) -> Result<Vec<Article>>;

    /// Overwrite every editable column of an existing article
    async fn update(&self, article: &Article) -> Result<Article>;

    /// Persist a publish transition
    async fn set_publish_state(
        &self,
        id: i64,
        published: bool,
        published_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Delete an article; returns whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Count all articles
    async fn count(&self) -> Result<i64>;

    /// Count published articles
    async fn count_published(&self) -> Result<i64>;
}

/// SQLx-based article repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxArticleRepository {
    pool: DynDatabasePool,
}

impl SqlxArticleRepository {
    /// Create a new SQLx article repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ArticleRepository> {
        Arc::new(Self::new(pool))
    }
}

const SELECT_ARTICLE: &str = r#"
    SELECT a.id, a.title, a.slug, a.excerpt, a.content, a.author, a.category_id,
           a.published, a.featured, a.image_url, a.created_at, a.updated_at, a.published_at,
           c.name AS category_name, c.slug AS category_slug
    FROM articles a
    LEFT JOIN categories c ON c.id = a.category_id
"#;

const INSERT_ARTICLE: &str = r#"
    INSERT INTO articles (title, slug, excerpt, content, author, category_id,
                          published, featured, image_url, created_at, updated_at, published_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPDATE_ARTICLE: &str = r#"
    UPDATE articles
    SET title = ?, slug = ?, excerpt = ?, content = ?, author = ?, category_id = ?,
        published = ?, featured = ?, image_url = ?, updated_at = ?, published_at = ?
    WHERE id = ?
"#;

const UPDATE_PUBLISH_STATE: &str =
    "UPDATE articles SET published = ?, published_at = ?, updated_at = ? WHERE id = ?";

const PUBLISHED_ORDER: &str = "ORDER BY a.published_at DESC, a.created_at DESC";

fn select_where(clause: &str) -> String {
    format!("{} {}", SELECT_ARTICLE, clause)
}

#[async_trait]
impl SlugProbe for SqlxArticleRepository {
    async fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool> {
        let sql = "SELECT COUNT(*) AS count FROM articles WHERE slug = ? AND id <> ?";
        // Ids start at 1, so 0 excludes nothing.
        let exclude = exclude_id.unwrap_or(0);
        let count: i64 = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(slug)
                .bind(exclude)
                .fetch_one(self.pool.sqlite()?)
                .await
                .context("Failed to check article slug")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(slug)
                .bind(exclude)
                .fetch_one(self.pool.mysql()?)
                .await
                .context("Failed to check article slug")?
                .get("count"),
        };
        Ok(count > 0)
    }
}

#[async_trait]
impl ArticleRepository for SqlxArticleRepository {
    async fn create(&self, article: &Article) -> Result<Article> {
        let id = match self.pool.driver() {
            DatabaseDriver::Sqlite => create_article_sqlite(self.pool.sqlite()?, article).await?,
            DatabaseDriver::Mysql => create_article_mysql(self.pool.mysql()?, article).await?,
        };
        self.get_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Article not found after insert"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Article>> {
        let sql = select_where("WHERE a.id = ?");
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get article by ID")?;
                row.as_ref().map(row_to_article_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(id)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get article by ID")?;
                row.as_ref().map(row_to_article_mysql).transpose()
            }
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        let sql = select_where("WHERE a.slug = ?");
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(slug)
                    .fetch_optional(self.pool.sqlite()?)
                    .await
                    .context("Failed to get article by slug")?;
                row.as_ref().map(row_to_article_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(slug)
                    .fetch_optional(self.pool.mysql()?)
                    .await
                    .context("Failed to get article by slug")?;
                row.as_ref().map(row_to_article_mysql).transpose()
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<Article>> {
        let sql = select_where("ORDER BY a.created_at DESC, a.id DESC");
        self.fetch_list(&sql, None, "Failed to list articles").await
    }

    async fn list_published(&self) -> Result<Vec<Article>> {
        let sql = select_where(&format!("WHERE a.published = TRUE {}", PUBLISHED_ORDER));
        self.fetch_list(&sql, None, "Failed to list published articles").await
    }

    async fn list_published_by_category(&self, category_id: i64) -> Result<Vec<Article>> {
        let sql = select_where(&format!(
            "WHERE a.published = TRUE AND a.category_id = ? {}",
            PUBLISHED_ORDER
        ));
        self.fetch_list(&sql, Some(category_id), "Failed to list articles by category")
            .await
    }

    async fn recent(&self, limit: i64) -> Result<Vec<Article>> {
        let sql = select_where("ORDER BY a.created_at DESC, a.id DESC LIMIT ?");
        self.fetch_list(&sql, Some(limit), "Failed to list recent articles").await
    }

    async fn update(&self, article: &Article) -> Result<Article> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => update_article_sqlite(self.pool.sqlite()?, article).await?,
            DatabaseDriver::Mysql => update_article_mysql(self.pool.mysql()?, article).await?,
        }
        self.get_by_id(article.id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Article not found after update"))
    }

    async fn set_publish_state(
        &self,
        id: i64,
        published: bool,
        published_at: Option<DateTime<Utc>>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                sqlx::query(UPDATE_PUBLISH_STATE)
                    .bind(published)
                    .bind(published_at)
                    .bind(updated_at)
                    .bind(id)
                    .execute(self.pool.sqlite()?)
                    .await
                    .context("Failed to update publish state")?;
            }
            DatabaseDriver::Mysql => {
                sqlx::query(UPDATE_PUBLISH_STATE)
                    .bind(published)
                    .bind(published_at)
                    .bind(updated_at)
                    .bind(id)
                    .execute(self.pool.mysql()?)
                    .await
                    .context("Failed to update publish state")?;
            }
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let sql = "DELETE FROM articles WHERE id = ?";
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(sql)
                .bind(id)
                .execute(self.pool.sqlite()?)
                .await
                .context("Failed to delete article")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query(sql)
                .bind(id)
                .execute(self.pool.mysql()?)
                .await
                .context("Failed to delete article")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn count(&self) -> Result<i64> {
        self.count_where("SELECT COUNT(*) AS count FROM articles").await
    }

    async fn count_published(&self) -> Result<i64> {
        self.count_where("SELECT COUNT(*) AS count FROM articles WHERE published = TRUE")
            .await
    }
}

impl SqlxArticleRepository {
    async fn fetch_list(&self, sql: &str, arg: Option<i64>, what: &'static str) -> Result<Vec<Article>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let mut query = sqlx::query(sql);
                if let Some(arg) = arg {
                    query = query.bind(arg);
                }
                let rows = query.fetch_all(self.pool.sqlite()?).await.context(what)?;
                rows.iter().map(row_to_article_sqlite).collect()
            }
            DatabaseDriver::Mysql => {
                let mut query = sqlx::query(sql);
                if let Some(arg) = arg {
                    query = query.bind(arg);
                }
                let rows = query.fetch_all(self.pool.mysql()?).await.context(what)?;
                rows.iter().map(row_to_article_mysql).collect()
            }
        }
    }

    async fn count_where(&self, sql: &str) -> Result<i64> {
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(sql)
                    .fetch_one(self.pool.sqlite()?)
                    .await
                    .context("Failed to count articles")?;
                row.get("count")
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(sql)
                    .fetch_one(self.pool.mysql()?)
                    .await
                    .context("Failed to count articles")?;
                row.get("count")
            }
        };
        Ok(count)
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_article_sqlite(pool: &SqlitePool, article: &Article) -> Result<i64> {
    let result = sqlx::query(INSERT_ARTICLE)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&article.author)
        .bind(article.category_id)
        .bind(article.published)
        .bind(article.featured)
        .bind(&article.image_url)
        .bind(article.created_at)
        .bind(article.updated_at)
        .bind(article.published_at)
        .execute(pool)
        .await
        .context("Failed to create article")?;

    Ok(result.last_insert_rowid())
}

async fn update_article_sqlite(pool: &SqlitePool, article: &Article) -> Result<()> {
    sqlx::query(UPDATE_ARTICLE)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&article.author)
        .bind(article.category_id)
        .bind(article.published)
        .bind(article.featured)
        .bind(&article.image_url)
        .bind(article.updated_at)
        .bind(article.published_at)
        .bind(article.id)
        .execute(pool)
        .await
        .context("Failed to update article")?;

    Ok(())
}

fn row_to_article_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Article> {
    let category_id: Option<i64> = row.get("category_id");
    let category_name: Option<String> = row.get("category_name");
    let category_slug: Option<String> = row.get("category_slug");

    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        author: row.get("author"),
        category_id,
        published: row.get("published"),
        featured: row.get("featured"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        published_at: row.get("published_at"),
        category: summary(category_id, category_name, category_slug),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_article_mysql(pool: &MySqlPool, article: &Article) -> Result<i64> {
    let result = sqlx::query(INSERT_ARTICLE)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&article.author)
        .bind(article.category_id)
        .bind(article.published)
        .bind(article.featured)
        .bind(&article.image_url)
        .bind(article.created_at)
        .bind(article.updated_at)
        .bind(article.published_at)
        .execute(pool)
        .await
        .context("Failed to create article")?;

    Ok(result.last_insert_id() as i64)
}

async fn update_article_mysql(pool: &MySqlPool, article: &Article) -> Result<()> {
    sqlx::query(UPDATE_ARTICLE)
        .bind(&article.title)
        .bind(&article.slug)
        .bind(&article.excerpt)
        .bind(&article.content)
        .bind(&article.author)
        .bind(article.category_id)
        .bind(article.published)
        .bind(article.featured)
        .bind(&article.image_url)
        .bind(article.updated_at)
        .bind(article.published_at)
        .bind(article.id)
        .execute(pool)
        .await
        .context("Failed to update article")?;

    Ok(())
}

fn row_to_article_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Article> {
    let category_id: Option<i64> = row.get("category_id");
    let category_name: Option<String> = row.get("category_name");
    let category_slug: Option<String> = row.get("category_slug");

    Ok(Article {
        id: row.get("id"),
        title: row.get("title"),
        slug: row.get("slug"),
        excerpt: row.get("excerpt"),
        content: row.get("content"),
        author: row.get("author"),
        category_id,
        published: row.get("published"),
        featured: row.get("featured"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        published_at: row.get("published_at"),
        category: summary(category_id, category_name, category_slug),
    })
}

fn summary(id: Option<i64>, name: Option<String>, slug: Option<String>) -> Option<CategorySummary> {
    match (id, name, slug) {
        (Some(id), Some(name), Some(slug)) => Some(CategorySummary { id, name, slug }),
        _ => None,
    }
}
