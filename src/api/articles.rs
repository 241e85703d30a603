//! Article API endpoints
//!
//! Public (published only):
//! - GET /api/v1/articles - Published articles, newest first
//! - GET /api/v1/articles/{slug} - One published article with rendered body
//!
//! Admin:
//! - GET /api/v1/admin/articles?q=&status= - Filtered list
//! - POST /api/v1/admin/articles - Create
//! - GET/PUT/DELETE /api/v1/admin/articles/{id}
//! - POST /api/v1/admin/articles/{id}/toggle-publish

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ArticleDetail, ArticleListResponse};
use crate::models::{Article, ArticleInput};
use crate::services::{ArticleFilter, StatusFilter};

/// Query parameters for the admin article list
#[derive(Debug, Default, Deserialize)]
pub struct ListArticlesQuery {
    /// Matched against title and author
    #[serde(default)]
    pub q: String,
    /// all | published | draft
    #[serde(default)]
    pub status: String,
}

impl ListArticlesQuery {
    fn to_filter(&self) -> Result<ArticleFilter, ApiError> {
        let status: StatusFilter = self.status.parse().map_err(ApiError::validation_error)?;
        Ok(ArticleFilter::new(self.q.clone(), status))
    }
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_published))
        .route("/{slug}", get(get_published))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_articles).post(create_article))
        .route("/{id}", get(get_article).put(update_article).delete(delete_article))
        .route("/{id}/toggle-publish", post(toggle_publish))
}

/// GET /api/v1/articles
async fn list_published(State(state): State<AppState>) -> Result<Json<ArticleListResponse>, ApiError> {
    let articles = state.article_service.list_published().await?;
    Ok(Json(articles.into()))
}

/// GET /api/v1/articles/{slug}
///
/// Drafts answer 404 exactly like unknown slugs.
async fn get_published(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ArticleDetail>, ApiError> {
    let article = state
        .article_service
        .get_published_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Article not found: {}", slug)))?;

    Ok(Json(ArticleDetail::render(article, &state.markdown)))
}

/// GET /api/v1/admin/articles
async fn list_articles(
    State(state): State<AppState>,
    Query(query): Query<ListArticlesQuery>,
) -> Result<Json<ArticleListResponse>, ApiError> {
    let filter = query.to_filter()?;
    let articles = state.article_service.list_filtered(&filter).await?;
    Ok(Json(articles.into()))
}

/// POST /api/v1/admin/articles
async fn create_article(
    State(state): State<AppState>,
    Json(input): Json<ArticleInput>,
) -> Result<(StatusCode, Json<Article>), ApiError> {
    let article = state.article_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(article)))
}

/// GET /api/v1/admin/articles/{id}
async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleDetail>, ApiError> {
    let article = state
        .article_service
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Article not found: {}", id)))?;

    Ok(Json(ArticleDetail::render(article, &state.markdown)))
}

/// PUT /api/v1/admin/articles/{id}
async fn update_article(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<ArticleInput>,
) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.article_service.update(id, input).await?))
}

/// DELETE /api/v1/admin/articles/{id}
async fn delete_article(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.article_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/articles/{id}/toggle-publish
async fn toggle_publish(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Article>, ApiError> {
    Ok(Json(state.article_service.toggle_publish(id).await?))
}
