//! Shared API response types

use serde::Serialize;

use crate::models::{Article, Category, NewsletterSubscriber, User};
use crate::services::MarkdownRenderer;

/// Article with its body rendered to HTML
#[derive(Debug, Serialize)]
pub struct ArticleDetail {
    #[serde(flatten)]
    pub article: Article,
    pub content_html: String,
}

impl ArticleDetail {
    pub fn render(article: Article, markdown: &MarkdownRenderer) -> Self {
        let content_html = markdown.render(&article.content);
        Self { article, content_html }
    }
}

#[derive(Debug, Serialize)]
pub struct ArticleListResponse {
    pub articles: Vec<Article>,
    pub total: usize,
}

impl From<Vec<Article>> for ArticleListResponse {
    fn from(articles: Vec<Article>) -> Self {
        Self {
            total: articles.len(),
            articles,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub categories: Vec<Category>,
}

/// Category page payload: the section and its published stories
#[derive(Debug, Serialize)]
pub struct CategoryArticlesResponse {
    pub category: Category,
    pub articles: Vec<Article>,
}

#[derive(Debug, Serialize)]
pub struct SubscriberListResponse {
    pub subscribers: Vec<NewsletterSubscriber>,
    pub total: usize,
}

/// Signed-in user as seen by the admin client
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl UserResponse {
    pub fn new(user: User, is_admin: bool) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_admin,
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleInput;
    use chrono::Utc;

    #[test]
    fn test_article_detail_flattens_fields() {
        let input = ArticleInput::new("Storm warning", "Heavy **rain** expected", "Desk");
        let article = Article::from_input(&input, "storm-warning".into(), Utc::now());

        let json = serde_json::to_value(ArticleDetail::render(article, &MarkdownRenderer::new())).unwrap();
        assert_eq!(json["slug"], "storm-warning");
        assert!(json["content_html"].as_str().unwrap().contains("<strong>rain</strong>"));
    }

    #[test]
    fn test_user_response_omits_password() {
        let user = User::new("desk@news.test".into(), "$argon2id$hash".into());
        let json = serde_json::to_string(&UserResponse::new(user, true)).unwrap();
        assert!(json.contains("\"is_admin\":true"));
        assert!(!json.contains("argon2id"));
    }
}
