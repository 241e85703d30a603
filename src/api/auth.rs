//! Authentication API endpoints
//!
//! - POST /api/v1/auth/login - Sign in, sets the `session` cookie
//! - POST /api/v1/auth/register - First-run account creation
//! - POST /api/v1/auth/logout - Sign out (authenticated)
//! - GET /api/v1/auth/me - Current user (authenticated)

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{extract_session_token, ApiError, AppState, AuthenticatedUser};
use crate::api::responses::UserResponse;

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

pub fn protected_router() -> Router<AppState> {
    Router::new()
        .route("/logout", post(logout))
        .route("/me", get(get_current_user))
}

/// POST /api/v1/auth/login
async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.user_service.sign_in(&body.email, &body.password).await?;

    let user = state
        .user_service
        .validate_session(&session.id)
        .await?
        .ok_or_else(|| ApiError::internal_error("Session validation failed"))?;
    let is_admin = state.admin_gate.is_admin(&user);

    let cookie = session_cookie(&session.id, state.session_days.saturating_mul(24 * 60 * 60));
    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::internal_error(e.to_string()))?,
    );

    Ok((
        response_headers,
        Json(AuthResponse {
            user: UserResponse::new(user, is_admin),
            token: session.id,
        }),
    ))
}

/// POST /api/v1/auth/register
///
/// Only succeeds while there are no accounts.
async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state.user_service.register(&body.email, &body.password).await?;
    let is_admin = state.admin_gate.is_admin(&user);
    if !is_admin {
        tracing::warn!("Registered user {} is not on the admin allow-list", user.id);
    }
    Ok((StatusCode::CREATED, Json(UserResponse::new(user, is_admin))))
}

/// POST /api/v1/auth/logout
async fn logout(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let token = extract_session_token(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    state.user_service.sign_out(&token).await?;

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_static("session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
    );

    Ok((StatusCode::NO_CONTENT, response_headers))
}

/// GET /api/v1/auth/me
async fn get_current_user(
    State(state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Json<UserResponse> {
    let is_admin = state.admin_gate.is_admin(&user);
    Json(UserResponse::new(user, is_admin))
}

fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "session={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        token,
        max_age_secs.max(0)
    )
}
