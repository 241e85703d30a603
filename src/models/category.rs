//! Category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::article::non_empty;

/// Category entity (news section such as "World" or "Sport")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: i64,
    /// Display name
    pub name: String,
    /// URL-friendly slug derived from the name
    pub slug: String,
    /// Optional blurb shown on the category page
    pub description: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Build an unsaved category from form input with an already-unique slug
    pub fn from_input(input: &CategoryInput, slug: String, now: DateTime<Utc>) -> Self {
        Self {
            id: 0, // Will be set by database
            name: input.name.trim().to_string(),
            slug,
            description: non_empty(&input.description),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Form payload for creating or editing a category
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
