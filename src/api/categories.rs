//! Category API endpoints
//!
//! - GET /api/v1/categories - All categories
//! - GET /api/v1/categories/{slug}/articles - Published articles in a category
//! - POST /api/v1/admin/categories - Create (admin)
//! - PUT/DELETE /api/v1/admin/categories/{id} - Rename or remove (admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{CategoryArticlesResponse, CategoryListResponse};
use crate::models::{Category, CategoryInput};

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories))
        .route("/{slug}/articles", get(list_category_articles))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_category))
        .route("/{id}", put(update_category).delete(delete_category))
}

/// GET /api/v1/categories
async fn list_categories(State(state): State<AppState>) -> Result<Json<CategoryListResponse>, ApiError> {
    let categories = state.category_service.list().await?;
    Ok(Json(CategoryListResponse { categories }))
}

/// GET /api/v1/categories/{slug}/articles
async fn list_category_articles(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CategoryArticlesResponse>, ApiError> {
    let category = state
        .category_service
        .get_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Category not found: {}", slug)))?;

    let articles = state
        .article_service
        .list_published_by_category(category.id)
        .await?;

    Ok(Json(CategoryArticlesResponse { category, articles }))
}

/// POST /api/v1/admin/categories
async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let category = state.category_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// PUT /api/v1/admin/categories/{id}
async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(state.category_service.update(id, input).await?))
}

/// DELETE /api/v1/admin/categories/{id}
async fn delete_category(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.category_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
