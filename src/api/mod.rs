//! API layer - HTTP handlers and routing
//!
//! - Public JSON API: published articles, categories, newsletter signup, site info
//! - Auth API: login, logout, current user, first-run registration
//! - Admin API: articles, categories, subscribers, dashboard, settings
//! - Server-rendered reading pages

pub mod admin;
pub mod articles;
pub mod auth;
pub mod categories;
pub mod middleware;
pub mod pages;
pub mod responses;
pub mod site;
pub mod subscribers;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// Build the `/api/v1` router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Admin routes (signed in and on the allow-list)
    let admin_routes = Router::new()
        .nest("/admin", admin::router())
        .nest("/admin/articles", articles::admin_router())
        .nest("/admin/categories", categories::admin_router())
        .nest("/admin/subscribers", subscribers::admin_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_auth,
        ));

    // Protected routes (signed in, any user)
    let protected_routes = Router::new()
        .nest("/auth", auth::protected_router())
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_auth,
        ));

    // Public routes
    Router::new()
        .nest("/articles", articles::public_router())
        .nest("/categories", categories::public_router())
        .nest("/newsletter", subscribers::public_router())
        .nest("/site", site::router())
        .nest("/auth", auth::public_router())
        .merge(admin_routes)
        .merge(protected_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> anyhow::Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS origin: {}", cors_origin))?;

    // Credentials allowed so the admin client can use the session cookie
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::COOKIE])
        .allow_credentials(true);

    Ok(Router::new()
        .nest("/api/v1", build_api_router(state.clone()))
        .merge(pages::router())
        .fallback(pages::not_found_page)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}
