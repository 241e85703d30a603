//! Category service
//!
//! Business logic for news sections: creation and renaming with derived,
//! collision-free slugs, plus lookups used by the reading site.

use crate::db::is_unique_violation;
use crate::db::repositories::CategoryRepository;
use crate::models::{Category, CategoryInput};
use crate::services::slug::{ensure_unique_slug, generate_slug};
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Error types for category service operations
#[derive(Debug, thiserror::Error)]
pub enum CategoryServiceError {
    #[error("Category not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The slug unique index rejected the write
    #[error("A category with this name already exists. Please choose a different name.")]
    DuplicateName(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }

    /// Create a category; the slug comes from the name
    pub async fn create(&self, input: CategoryInput) -> Result<Category, CategoryServiceError> {
        validate_input(&input)?;
        let slug = self.unique_slug_for(&input.name, None).await?;

        let category = Category::from_input(&input, slug, Utc::now());
        let created = self
            .repo
            .create(&category)
            .await
            .map_err(|e| write_error(e, &category.name))?;

        tracing::info!("Category created: {} ({})", created.id, created.slug);
        Ok(created)
    }

    /// Rename or re-describe a category; the slug follows the name
    pub async fn update(&self, id: i64, input: CategoryInput) -> Result<Category, CategoryServiceError> {
        let existing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get category")?
            .ok_or_else(|| CategoryServiceError::NotFound(id.to_string()))?;
        validate_input(&input)?;
        let slug = self.unique_slug_for(&input.name, Some(id)).await?;

        let mut category = Category::from_input(&input, slug, Utc::now());
        category.id = existing.id;
        category.created_at = existing.created_at;

        let updated = self
            .repo
            .update(&category)
            .await
            .map_err(|e| write_error(e, &category.name))?;

        tracing::info!("Category updated: {} ({})", updated.id, updated.slug);
        Ok(updated)
    }

    /// Delete a category; its articles stay, uncategorised
    pub async fn delete(&self, id: i64) -> Result<(), CategoryServiceError> {
        if !self.repo.delete(id).await.context("Failed to delete category")? {
            return Err(CategoryServiceError::NotFound(id.to_string()));
        }
        tracing::info!("Category deleted: {}", id);
        Ok(())
    }

    /// All categories ordered by name
    pub async fn list(&self) -> Result<Vec<Category>, CategoryServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<Category>, CategoryServiceError> {
        Ok(self.repo.get_by_slug(slug).await?)
    }

    pub async fn count(&self) -> Result<i64, CategoryServiceError> {
        Ok(self.repo.count().await?)
    }

    async fn unique_slug_for(&self, name: &str, exclude_id: Option<i64>) -> Result<String, CategoryServiceError> {
        let base = generate_slug(name);
        if base.is_empty() {
            return Err(CategoryServiceError::ValidationError(
                "Name must contain at least one letter or digit".to_string(),
            ));
        }
        let slug = ensure_unique_slug(self.repo.as_ref(), &base, exclude_id)
            .await
            .context("Failed to check slug uniqueness")?;
        Ok(slug)
    }
}

fn validate_input(input: &CategoryInput) -> Result<(), CategoryServiceError> {
    if input.name.trim().is_empty() {
        return Err(CategoryServiceError::ValidationError(
            "Category name cannot be empty".to_string(),
        ));
    }
    Ok(())
}

fn write_error(err: anyhow::Error, name: &str) -> CategoryServiceError {
    if is_unique_violation(&err) {
        CategoryServiceError::DuplicateName(name.to_string())
    } else {
        CategoryServiceError::InternalError(err)
    }
}
