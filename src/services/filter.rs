//! Admin article list filtering
//!
//! The admin list fetches every article once and narrows it in memory by a
//! free-text query and a publish-status selector.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::Article;

/// Publish-status selector for the admin article list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Published,
    Draft,
}

impl StatusFilter {
    pub fn matches(self, published: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Published => published,
            StatusFilter::Draft => !published,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(StatusFilter::All),
            "published" => Ok(StatusFilter::Published),
            "draft" => Ok(StatusFilter::Draft),
            other => Err(format!("Unknown status filter: {}", other)),
        }
    }
}

/// Search text plus status selector
#[derive(Debug, Clone, Default)]
pub struct ArticleFilter {
    pub query: String,
    pub status: StatusFilter,
}

impl ArticleFilter {
    pub fn new(query: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            query: query.into(),
            status,
        }
    }

    /// Whether a single article passes both the search and the status filter
    pub fn matches(&self, article: &Article) -> bool {
        self.status.matches(article.published) && self.matches_query(article)
    }

    /// Keep the articles that pass, preserving input order
    pub fn apply<'a>(&self, articles: &'a [Article]) -> Vec<&'a Article> {
        articles.iter().filter(|a| self.matches(a)).collect()
    }

    fn matches_query(&self, article: &Article) -> bool {
        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || article.title.to_lowercase().contains(&needle)
            || article.author.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleInput;
    use chrono::Utc;

    fn article(title: &str, author: &str, published: bool) -> Article {
        let input = ArticleInput::new(title, "Body", author).with_published(published);
        Article::from_input(&input, title.to_lowercase(), Utc::now())
    }

    fn fixtures() -> Vec<Article> {
        vec![
            article("Election results", "Ana Ruiz", true),
            article("Budget draft leaked", "Tom Lee", false),
            article("Local elections preview", "Tom Lee", false),
            article("Football final", "Ana Ruiz", true),
        ]
    }

    fn titles(found: Vec<&Article>) -> Vec<String> {
        found.into_iter().map(|a| a.title.clone()).collect()
    }

    #[test]
    fn test_empty_filter_keeps_everything_in_order() {
        let articles = fixtures();
        let found = ArticleFilter::default().apply(&articles);
        assert_eq!(found.len(), 4);
        assert_eq!(found[0].title, "Election results");
    }

    #[test]
    fn test_draft_filter_returns_only_unpublished() {
        let articles = fixtures();
        let found = ArticleFilter::new("", StatusFilter::Draft).apply(&articles);
        assert_eq!(titles(found), vec!["Budget draft leaked", "Local elections preview"]);
    }

    #[test]
    fn test_search_matches_title_or_author_case_insensitively() {
        let articles = fixtures();

        let by_title = ArticleFilter::new("ELECTION", StatusFilter::All).apply(&articles);
        assert_eq!(titles(by_title), vec!["Election results", "Local elections preview"]);

        let by_author = ArticleFilter::new("ana", StatusFilter::All).apply(&articles);
        assert_eq!(titles(by_author), vec!["Election results", "Football final"]);
    }

    #[test]
    fn test_search_and_status_combine() {
        let articles = fixtures();
        let found = ArticleFilter::new("election", StatusFilter::Draft).apply(&articles);
        assert_eq!(titles(found), vec!["Local elections preview"]);

        let found = ArticleFilter::new("tom", StatusFilter::Published).apply(&articles);
        assert!(found.is_empty());
    }

    #[test]
    fn test_status_filter_parsing() {
        assert_eq!("all".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!("Published".parse::<StatusFilter>(), Ok(StatusFilter::Published));
        assert_eq!(" draft ".parse::<StatusFilter>(), Ok(StatusFilter::Draft));
        assert!("archived".parse::<StatusFilter>().is_err());
    }
}
