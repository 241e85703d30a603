//! Settings service
//!
//! Typed view over the key/value `settings` table.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use crate::db::repositories::SettingsRepository;

/// Known setting keys
pub mod keys {
    pub const SITE_NAME: &str = "site_name";
    pub const SITE_DESCRIPTION: &str = "site_description";
    pub const CONTACT_EMAIL: &str = "contact_email";
    pub const NEWSLETTER_ENABLED: &str = "newsletter_enabled";
}

/// Site settings as edited from the admin panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub newsletter_enabled: bool,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: "Newsdesk".to_string(),
            site_description: "Independent news and analysis".to_string(),
            contact_email: String::new(),
            newsletter_enabled: true,
        }
    }
}

impl SiteSettings {
    fn from_map(map: &HashMap<String, String>) -> Self {
        let defaults = Self::default();
        Self {
            site_name: map.get(keys::SITE_NAME).cloned().unwrap_or(defaults.site_name),
            site_description: map
                .get(keys::SITE_DESCRIPTION)
                .cloned()
                .unwrap_or(defaults.site_description),
            contact_email: map.get(keys::CONTACT_EMAIL).cloned().unwrap_or(defaults.contact_email),
            newsletter_enabled: map
                .get(keys::NEWSLETTER_ENABLED)
                .map(|v| parse_flag(v))
                .unwrap_or(defaults.newsletter_enabled),
        }
    }

    /// The part of the settings the reading site may see
    pub fn public(&self) -> PublicSite {
        PublicSite {
            site_name: self.site_name.clone(),
            site_description: self.site_description.clone(),
            newsletter_enabled: self.newsletter_enabled,
        }
    }
}

/// Settings exposed without authentication
#[derive(Debug, Clone, Serialize)]
pub struct PublicSite {
    pub site_name: String,
    pub site_description: String,
    pub newsletter_enabled: bool,
}

/// Partial update; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteSettingsUpdate {
    pub site_name: Option<String>,
    pub site_description: Option<String>,
    pub contact_email: Option<String>,
    pub newsletter_enabled: Option<bool>,
}

#[derive(Debug, Error)]
pub enum SettingsServiceError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct SettingsService {
    repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(repo: Arc<dyn SettingsRepository>) -> Self {
        Self { repo }
    }

    /// Current settings; missing keys fall back to defaults
    pub async fn get_site_settings(&self) -> Result<SiteSettings, SettingsServiceError> {
        let map = self.repo.get_all().await?;
        Ok(SiteSettings::from_map(&map))
    }

    /// Apply a partial update and return the resulting settings
    pub async fn update_site_settings(
        &self,
        update: SiteSettingsUpdate,
    ) -> Result<SiteSettings, SettingsServiceError> {
        let mut changes = HashMap::new();

        if let Some(name) = update.site_name {
            let name = name.trim();
            if name.is_empty() {
                return Err(SettingsServiceError::ValidationError(
                    "Site name cannot be empty".to_string(),
                ));
            }
            changes.insert(keys::SITE_NAME.to_string(), name.to_string());
        }
        if let Some(description) = update.site_description {
            changes.insert(keys::SITE_DESCRIPTION.to_string(), description.trim().to_string());
        }
        if let Some(email) = update.contact_email {
            changes.insert(keys::CONTACT_EMAIL.to_string(), email.trim().to_string());
        }
        if let Some(enabled) = update.newsletter_enabled {
            changes.insert(keys::NEWSLETTER_ENABLED.to_string(), enabled.to_string());
        }

        if !changes.is_empty() {
            self.repo.set_many(&changes).await?;
            tracing::info!("Site settings updated: {} key(s)", changes.len());
        }
        self.get_site_settings().await
    }

    /// Whether the public signup form accepts new subscribers
    pub async fn newsletter_enabled(&self) -> Result<bool, SettingsServiceError> {
        let setting = self.repo.get(keys::NEWSLETTER_ENABLED).await?;
        Ok(setting.map(|s| parse_flag(&s.value)).unwrap_or(true))
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
