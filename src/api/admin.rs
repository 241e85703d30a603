//! Admin API endpoints
//!
//! - GET /api/v1/admin/dashboard - Counts and the latest articles
//! - GET /api/v1/admin/settings - Site settings
//! - PUT /api/v1/admin/settings - Partial settings update

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::api::middleware::{ApiError, AppState};
use crate::models::Article;
use crate::services::{SiteSettings, SiteSettingsUpdate};

/// Articles shown in the dashboard's "recent" panel
const DASHBOARD_RECENT: i64 = 5;

/// Response for dashboard stats
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub total_articles: i64,
    pub published_articles: i64,
    pub draft_articles: i64,
    pub total_categories: i64,
    pub total_subscribers: i64,
    pub recent_articles: Vec<Article>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(get_dashboard))
        .route("/settings", get(get_settings).put(update_settings))
}

/// GET /api/v1/admin/dashboard
async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, ApiError> {
    let total_articles = state.article_service.count().await?;
    let published_articles = state.article_service.count_published().await?;
    let total_categories = state.category_service.count().await?;
    let total_subscribers = state.subscriber_service.count().await?;
    let recent_articles = state.article_service.recent(DASHBOARD_RECENT).await?;

    Ok(Json(DashboardResponse {
        total_articles,
        published_articles,
        draft_articles: total_articles - published_articles,
        total_categories,
        total_subscribers,
        recent_articles,
    }))
}

/// GET /api/v1/admin/settings
async fn get_settings(State(state): State<AppState>) -> Result<Json<SiteSettings>, ApiError> {
    Ok(Json(state.settings_service.get_site_settings().await?))
}

/// PUT /api/v1/admin/settings
async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SiteSettingsUpdate>,
) -> Result<Json<SiteSettings>, ApiError> {
    Ok(Json(state.settings_service.update_site_settings(update).await?))
}
