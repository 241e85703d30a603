//! Public site information API
//!
//! Site name, description and whether the newsletter form is shown. No
//! authentication required.

use axum::{extract::State, routing::get, Json, Router};

use crate::api::middleware::AppState;
use crate::services::{PublicSite, SiteSettings};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_site_info))
}

/// GET /api/v1/site
///
/// Falls back to defaults when the settings cannot be read.
async fn get_site_info(State(state): State<AppState>) -> Json<PublicSite> {
    Json(load_public_site(&state).await)
}

/// Public settings for the reading site; failures are logged, not surfaced
pub async fn load_public_site(state: &AppState) -> PublicSite {
    match state.settings_service.get_site_settings().await {
        Ok(settings) => settings.public(),
        Err(e) => {
            tracing::warn!("Failed to load site settings, using defaults: {}", e);
            SiteSettings::default().public()
        }
    }
}
