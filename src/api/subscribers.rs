//! Newsletter endpoints
//!
//! - POST /api/v1/newsletter - Public signup
//! - GET /api/v1/admin/subscribers - List (admin)
//! - DELETE /api/v1/admin/subscribers/{id} - Remove (admin)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::SubscriberListResponse;
use crate::models::NewsletterSubscriber;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

pub fn public_router() -> Router<AppState> {
    Router::new().route("/", post(subscribe))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subscribers))
        .route("/{id}", delete(delete_subscriber))
}

/// POST /api/v1/newsletter
async fn subscribe(
    State(state): State<AppState>,
    Json(body): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<NewsletterSubscriber>), ApiError> {
    if !state.settings_service.newsletter_enabled().await? {
        return Err(ApiError::forbidden("Newsletter signups are currently closed."));
    }

    let subscriber = state.subscriber_service.subscribe(&body.email).await?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}

/// GET /api/v1/admin/subscribers
async fn list_subscribers(State(state): State<AppState>) -> Result<Json<SubscriberListResponse>, ApiError> {
    let subscribers = state.subscriber_service.list().await?;
    Ok(Json(SubscriberListResponse {
        total: subscribers.len(),
        subscribers,
    }))
}

/// DELETE /api/v1/admin/subscribers/{id}
async fn delete_subscriber(State(state): State<AppState>, Path(id): Path<i64>) -> Result<StatusCode, ApiError> {
    state.subscriber_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
