//! Article service
//!
//! Implements business logic for article management:
//! - Create, read, update, delete articles
//! - Slug derivation with collision suffixes
//! - Publish/unpublish transitions
//! - Required-field validation

use crate::db::{is_foreign_key_violation, is_unique_violation};
use crate::db::repositories::ArticleRepository;
use crate::models::{Article, ArticleInput};
use crate::services::filter::ArticleFilter;
use crate::services::publish::PublishState;
use crate::services::slug::{ensure_unique_slug, generate_slug};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for article service operations
#[derive(Debug, thiserror::Error)]
pub enum ArticleServiceError {
    /// Article not found
    #[error("Article not found: {0}")]
    NotFound(String),

    /// Missing required field or unusable title
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The slug unique index rejected the write
    #[error("An article with this title already exists. Please choose a different title.")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Article service for the newsroom back office and reading site
pub struct ArticleService {
    repo: Arc<dyn ArticleRepository>,
}

impl ArticleService {
    pub fn new(repo: Arc<dyn ArticleRepository>) -> Self {
        Self { repo }
    }

    /// Create a new article
    ///
    /// The slug is derived from the title and made unique within the
    /// articles table. Articles created as published are stamped with the
    /// current time as `published_at`.
    ///
    /// # Errors
    /// - `ValidationError` if title, content or author is empty, or the title
    ///   has no characters usable in a slug
    /// - `ValidationError` if `category_id` names a category that doesn't exist
    /// - `DuplicateSlug` if a concurrent write took the slug first
    pub async fn create(&self, input: ArticleInput) -> Result<Article, ArticleServiceError> {
        validate_input(&input)?;
        let slug = self.unique_slug_for(&input.title, None).await?;

        let article = Article::from_input(&input, slug, Utc::now());
        let created = self
            .repo
            .create(&article)
            .await
            .map_err(|e| write_error(e, &article.slug))?;

        tracing::info!("Article created: {} ({})", created.id, created.slug);
        Ok(created)
    }

    /// Replace an article's editable fields
    ///
    /// The slug is re-derived from the (possibly unchanged) title with the
    /// article's own row excluded from the collision check, so saving without
    /// renaming keeps the current slug.
    pub async fn update(&self, id: i64, input: ArticleInput) -> Result<Article, ArticleServiceError> {
        let existing = self.require(id).await?;
        validate_input(&input)?;
        let slug = self.unique_slug_for(&input.title, Some(id)).await?;

        let now = Utc::now();
        let state = PublishState::of(&existing).transition_to(input.published, now);

        let mut article = Article::from_input(&input, slug, now);
        article.id = existing.id;
        article.created_at = existing.created_at;
        article.published = state.published;
        article.published_at = state.published_at;

        let updated = self
            .repo
            .update(&article)
            .await
            .map_err(|e| write_error(e, &article.slug))?;

        tracing::info!("Article updated: {} ({})", updated.id, updated.slug);
        Ok(updated)
    }

    /// Flip an article between draft and published
    pub async fn toggle_publish(&self, id: i64) -> Result<Article, ArticleServiceError> {
        let existing = self.require(id).await?;
        let now = Utc::now();
        let state = PublishState::of(&existing).toggled(now);

        self.repo
            .set_publish_state(id, state.published, state.published_at, now)
            .await
            .context("Failed to toggle publish state")?;

        tracing::info!(
            "Article {} {}",
            id,
            if state.published { "published" } else { "unpublished" }
        );

        Ok(Article {
            published: state.published,
            published_at: state.published_at,
            updated_at: now,
            ..existing
        })
    }

    /// Delete an article
    pub async fn delete(&self, id: i64) -> Result<(), ArticleServiceError> {
        let removed = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete article")?;
        if !removed {
            return Err(ArticleServiceError::NotFound(id.to_string()));
        }
        tracing::info!("Article deleted: {}", id);
        Ok(())
    }

    /// Get article by ID, drafts included
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Article>, ArticleServiceError> {
        Ok(self.repo.get_by_id(id).await.context("Failed to get article")?)
    }

    /// Get a published article by slug; drafts are reported as missing
    pub async fn get_published_by_slug(&self, slug: &str) -> Result<Option<Article>, ArticleServiceError> {
        let article = self
            .repo
            .get_by_slug(slug)
            .await
            .context("Failed to get article by slug")?;
        Ok(article.filter(Article::is_visible))
    }

    /// Every article, newest first
    pub async fn list_all(&self) -> Result<Vec<Article>, ArticleServiceError> {
        Ok(self.repo.list_all().await?)
    }

    /// Every article passing the admin list filter, newest first
    pub async fn list_filtered(&self, filter: &ArticleFilter) -> Result<Vec<Article>, ArticleServiceError> {
        let all = self.repo.list_all().await?;
        Ok(filter.apply(&all).into_iter().cloned().collect())
    }

    /// Published articles, newest publication first
    pub async fn list_published(&self) -> Result<Vec<Article>, ArticleServiceError> {
        Ok(self.repo.list_published().await?)
    }

    /// Published articles in a category, newest publication first
    pub async fn list_published_by_category(
        &self,
        category_id: i64,
    ) -> Result<Vec<Article>, ArticleServiceError> {
        Ok(self.repo.list_published_by_category(category_id).await?)
    }

    /// Most recently created articles for the dashboard
    pub async fn recent(&self, limit: i64) -> Result<Vec<Article>, ArticleServiceError> {
        Ok(self.repo.recent(limit.max(0)).await?)
    }

    pub async fn count(&self) -> Result<i64, ArticleServiceError> {
        Ok(self.repo.count().await?)
    }

    pub async fn count_published(&self) -> Result<i64, ArticleServiceError> {
        Ok(self.repo.count_published().await?)
    }

    async fn require(&self, id: i64) -> Result<Article, ArticleServiceError> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| ArticleServiceError::NotFound(id.to_string()))
    }

    async fn unique_slug_for(&self, title: &str, exclude_id: Option<i64>) -> Result<String, ArticleServiceError> {
        let base = generate_slug(title);
        if base.is_empty() {
            return Err(ArticleServiceError::ValidationError(
                "Title must contain at least one letter or digit".to_string(),
            ));
        }
        let slug = ensure_unique_slug(self.repo.as_ref(), &base, exclude_id)
            .await
            .context("Failed to check slug uniqueness")?;
        Ok(slug)
    }
}

fn validate_input(input: &ArticleInput) -> Result<(), ArticleServiceError> {
    for (field, value) in [
        ("Title", &input.title),
        ("Content", &input.content),
        ("Author", &input.author),
    ] {
        if value.trim().is_empty() {
            return Err(ArticleServiceError::ValidationError(format!(
                "{} cannot be empty",
                field
            )));
        }
    }
    Ok(())
}

fn write_error(err: anyhow::Error, slug: &str) -> ArticleServiceError {
    if is_unique_violation(&err) {
        tracing::warn!("Slug '{}' was taken between probe and write", slug);
        ArticleServiceError::DuplicateSlug(slug.to_string())
    } else if is_foreign_key_violation(&err) {
        ArticleServiceError::ValidationError("Category not found".to_string())
    } else {
        ArticleServiceError::InternalError(err)
    }
}
