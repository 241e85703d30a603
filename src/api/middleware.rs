//! API middleware
//!
//! Contains:
//! - Shared application state
//! - The JSON error envelope and its HTTP status mapping
//! - Authentication (session token validation)
//! - Authorization (admin allow-list)

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::db::repositories::{
    SqlxArticleRepository, SqlxCategoryRepository, SqlxSessionRepository, SqlxSettingsRepository,
    SqlxSubscriberRepository, SqlxUserRepository,
};
use crate::db::DynDatabasePool;
use crate::models::User;
use crate::services::{
    AdminGate, ArticleService, ArticleServiceError, CategoryService, CategoryServiceError,
    MarkdownRenderer, SettingsService, SettingsServiceError, SubscriberService,
    SubscriberServiceError, UserService, UserServiceError,
};
use crate::theme::ThemeEngine;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub article_service: Arc<ArticleService>,
    pub category_service: Arc<CategoryService>,
    pub subscriber_service: Arc<SubscriberService>,
    pub settings_service: Arc<SettingsService>,
    pub user_service: Arc<UserService>,
    pub admin_gate: Arc<AdminGate>,
    pub theme_engine: Arc<ThemeEngine>,
    pub markdown: MarkdownRenderer,
    /// Session lifetime, mirrored into the cookie's Max-Age
    pub session_days: i64,
}

impl AppState {
    /// Wire repositories and services over one database pool
    pub fn build(pool: DynDatabasePool, auth: &AuthConfig) -> anyhow::Result<Self> {
        let user_service = UserService::with_session_days(
            SqlxUserRepository::boxed(pool.clone()),
            SqlxSessionRepository::boxed(pool.clone()),
            auth.session_days,
        );

        Ok(Self {
            article_service: Arc::new(ArticleService::new(SqlxArticleRepository::boxed(pool.clone()))),
            category_service: Arc::new(CategoryService::new(SqlxCategoryRepository::boxed(pool.clone()))),
            subscriber_service: Arc::new(SubscriberService::new(SqlxSubscriberRepository::boxed(pool.clone()))),
            settings_service: Arc::new(SettingsService::new(SqlxSettingsRepository::boxed(pool))),
            user_service: Arc::new(user_service),
            admin_gate: Arc::new(AdminGate::new(&auth.admin_emails)),
            theme_engine: Arc::new(ThemeEngine::new()?),
            markdown: MarkdownRenderer::new(),
            session_days: auth.session_days,
        })
    }
}

/// Authenticated user extracted from request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new("UNAUTHORIZED", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    /// Logged here so every handler doesn't have to
    pub fn internal_error(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!("Internal error: {}", message);
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "UNAUTHORIZED" => StatusCode::UNAUTHORIZED,
            "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ArticleServiceError> for ApiError {
    fn from(err: ArticleServiceError) -> Self {
        match err {
            ArticleServiceError::NotFound(id) => ApiError::not_found(format!("Article not found: {}", id)),
            ArticleServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            e @ ArticleServiceError::DuplicateSlug(_) => ApiError::conflict(e.to_string()),
            ArticleServiceError::InternalError(e) => ApiError::internal_error(format!("{:#}", e)),
        }
    }
}

impl From<CategoryServiceError> for ApiError {
    fn from(err: CategoryServiceError) -> Self {
        match err {
            CategoryServiceError::NotFound(id) => ApiError::not_found(format!("Category not found: {}", id)),
            CategoryServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            e @ CategoryServiceError::DuplicateName(_) => ApiError::conflict(e.to_string()),
            CategoryServiceError::InternalError(e) => ApiError::internal_error(format!("{:#}", e)),
        }
    }
}

impl From<SubscriberServiceError> for ApiError {
    fn from(err: SubscriberServiceError) -> Self {
        match err {
            SubscriberServiceError::NotFound(id) => ApiError::not_found(format!("Subscriber not found: {}", id)),
            SubscriberServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            e @ SubscriberServiceError::AlreadySubscribed => ApiError::conflict(e.to_string()),
            SubscriberServiceError::InternalError(e) => ApiError::internal_error(format!("{:#}", e)),
        }
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match err {
            e @ UserServiceError::InvalidCredentials => ApiError::unauthorized(e.to_string()),
            e @ UserServiceError::RegistrationClosed => ApiError::forbidden(e.to_string()),
            UserServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            e @ UserServiceError::DuplicateEmail(_) => ApiError::conflict(e.to_string()),
            UserServiceError::InternalError(e) => ApiError::internal_error(format!("{:#}", e)),
        }
    }
}

impl From<SettingsServiceError> for ApiError {
    fn from(err: SettingsServiceError) -> Self {
        match err {
            SettingsServiceError::ValidationError(msg) => ApiError::validation_error(msg),
            SettingsServiceError::InternalError(e) => ApiError::internal_error(format!("{:#}", e)),
        }
    }
}

/// Session token from `Authorization: Bearer` or the `session` cookie.
///
/// The bearer header wins when both are present.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let token = token.trim();
                if !token.is_empty() {
                    return Some(token.to_string());
                }
            }
        }
    }

    for cookie_header in headers.get_all(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                if let Some(token) = cookie.trim().strip_prefix("session=") {
                    if !token.is_empty() {
                        return Some(token.to_string());
                    }
                }
            }
        }
    }

    None
}

/// Authentication middleware
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_token(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing authentication token"))?;

    let user = state
        .user_service
        .validate_session(&token)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Invalid or expired session"))?;

    request.extensions_mut().insert(AuthenticatedUser(user));
    Ok(next.run(request).await)
}

/// Admin authorization middleware; runs after `require_auth`
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or_else(|| ApiError::unauthorized("Authentication required"))?;

    if !state.admin_gate.is_admin(&user.0) {
        tracing::warn!("Admin access denied for user {}", user.0.id);
        return Err(ApiError::forbidden("Admin privileges required"));
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_extract_session_token_from_bearer() {
        let map = headers(&[(header::AUTHORIZATION, "Bearer test-token-123")]);
        assert_eq!(extract_session_token(&map), Some("test-token-123".to_string()));
    }

    #[test]
    fn test_extract_session_token_from_cookie() {
        let map = headers(&[(header::COOKIE, "theme=dark; session=test-token-456")]);
        assert_eq!(extract_session_token(&map), Some("test-token-456".to_string()));
    }

    #[test]
    fn test_extract_session_token_bearer_priority() {
        let map = headers(&[
            (header::AUTHORIZATION, "Bearer bearer-token"),
            (header::COOKIE, "session=cookie-token"),
        ]);
        assert_eq!(extract_session_token(&map), Some("bearer-token".to_string()));
    }

    #[test]
    fn test_extract_session_token_none() {
        assert!(extract_session_token(&HeaderMap::new()).is_none());
        let map = headers(&[(header::AUTHORIZATION, "Basic invalid"), (header::COOKIE, "session=")]);
        assert!(extract_session_token(&map).is_none());
    }

    #[test]
    fn test_api_error_status_mapping() {
        assert_eq!(ApiError::unauthorized("x").status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden("x").status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::validation_error("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::conflict("x").status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::new("SOMETHING_ELSE", "x").status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_api_error_serialization() {
        let json = serde_json::to_value(ApiError::not_found("Missing")).unwrap();
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Missing");
        assert!(json["error"].get("details").is_none());

        let json = serde_json::to_value(ApiError::with_details(
            "VALIDATION_ERROR",
            "Bad",
            serde_json::json!({"field": "title"}),
        ))
        .unwrap();
        assert_eq!(json["error"]["details"]["field"], "title");
    }

    #[test]
    fn test_duplicate_slug_maps_to_conflict() {
        let err: ApiError = ArticleServiceError::DuplicateSlug("breaking-news".into()).into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(
            err.error.message,
            "An article with this title already exists. Please choose a different title."
        );

        let err: ApiError = SubscriberServiceError::AlreadySubscribed.into();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
