//! Article model
//!
//! This module provides:
//! - `Article` entity representing a news story
//! - `CategorySummary` carried alongside an article when it is listed
//! - `ArticleInput`, the editor form payload used for both create and edit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Article entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Unique identifier
    pub id: i64,
    /// Headline
    pub title: String,
    /// URL-friendly slug derived from the title
    pub slug: String,
    /// Short teaser shown on listing pages
    pub excerpt: Option<String>,
    /// Markdown body
    pub content: String,
    /// Byline (free text, not a user reference)
    pub author: String,
    /// Category ID
    pub category_id: Option<i64>,
    /// Whether the article is visible on the public site
    pub published: bool,
    /// Whether the article is featured on the front page
    pub featured: bool,
    /// Lead image URL
    pub image_url: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
    /// Publication timestamp, set while published
    pub published_at: Option<DateTime<Utc>>,
    /// Category the article belongs to, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<CategorySummary>,
}

impl Article {
    /// Build an unsaved article from editor input
    ///
    /// `slug` must already be unique; `published_at` is stamped when the
    /// article is created in the published state.
    pub fn from_input(input: &ArticleInput, slug: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0, // Will be set by database
            title: input.title.trim().to_string(),
            slug,
            excerpt: non_empty(&input.excerpt),
            content: input.content.clone(),
            author: input.author.trim().to_string(),
            category_id: input.category_id,
            published: input.published,
            featured: input.featured,
            image_url: non_empty(&input.image_url),
            created_at: now,
            updated_at: now,
            published_at: if input.published { Some(now) } else { None },
            category: None,
        }
    }

    /// Whether readers may see this article
    pub fn is_visible(&self) -> bool {
        self.published
    }
}

/// Category id, name and slug attached to a listed article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// Editor form payload for creating or editing an article
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArticleInput {
    pub title: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    pub content: String,
    pub author: String,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl ArticleInput {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    /// Set the category ID
    pub fn with_category_id(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set the published flag
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Set the excerpt
    pub fn with_excerpt(mut self, excerpt: impl Into<String>) -> Self {
        self.excerpt = Some(excerpt.into());
        self
    }
}

/// Treat blank optional form fields as absent
pub(crate) fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_input_stamps_published_at_only_when_published() {
        let now = Utc::now();

        let draft = Article::from_input(&ArticleInput::new("Title", "Body", "Desk"), "title".into(), now);
        assert!(!draft.published);
        assert!(draft.published_at.is_none());

        let live = Article::from_input(
            &ArticleInput::new("Title", "Body", "Desk").with_published(true),
            "title".into(),
            now,
        );
        assert!(live.published);
        assert_eq!(live.published_at, Some(now));
    }

    #[test]
    fn test_from_input_trims_and_drops_blank_optionals() {
        let mut input = ArticleInput::new("  Storm warning  ", "Body", " Jane Roe ");
        input.excerpt = Some("   ".into());
        input.image_url = Some(" https://img.test/a.jpg ".into());

        let article = Article::from_input(&input, "storm-warning".into(), Utc::now());

        assert_eq!(article.title, "Storm warning");
        assert_eq!(article.author, "Jane Roe");
        assert!(article.excerpt.is_none());
        assert_eq!(article.image_url.as_deref(), Some("https://img.test/a.jpg"));
    }

    #[test]
    fn test_input_deserializes_with_defaults() {
        let input: ArticleInput =
            serde_json::from_str(r#"{"title":"T","content":"C","author":"A"}"#).unwrap();
        assert!(!input.published);
        assert!(!input.featured);
        assert!(input.category_id.is_none());
    }
}
