//! Slug generation
//!
//! Turns headlines and section names into URL path segments and keeps them
//! unique within a table by appending `-1`, `-2`, ... on collision.

use anyhow::Result;
use async_trait::async_trait;

/// Derive a URL slug from free text.
///
/// Lowercases the input, drops everything outside `[a-z0-9]`, whitespace and
/// `-`, collapses runs of whitespace, `_` and `-` into a single `-`, and trims
/// hyphens from both ends. May return an empty string.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_hyphen = true;
        }
    }

    slug
}

/// Answers whether a slug is already used by a row other than `exclude_id`.
#[async_trait]
pub trait SlugProbe: Send + Sync {
    async fn slug_taken(&self, slug: &str, exclude_id: Option<i64>) -> Result<bool>;
}

/// Find the first free slug among `base`, `base-1`, `base-2`, ...
///
/// Probe errors are returned as-is so the caller writes nothing.
pub async fn ensure_unique_slug<P>(probe: &P, base: &str, exclude_id: Option<i64>) -> Result<String>
where
    P: SlugProbe + ?Sized,
{
    let mut candidate = base.to_string();
    let mut counter: u32 = 0;

    while probe.slug_taken(&candidate, exclude_id).await? {
        counter += 1;
        candidate = format!("{}-{}", base, counter);
    }

    if counter > 0 {
        tracing::debug!("Slug '{}' taken, using '{}'", base, candidate);
    }

    Ok(candidate)
}
