//! Services layer - Business logic
//!
//! Services sit between the HTTP handlers and the repositories. They own
//! validation, slug derivation, publish transitions and the mapping of
//! storage failures onto domain errors.

pub mod article;
pub mod category;
pub mod filter;
pub mod markdown;
pub mod password;
pub mod publish;
pub mod settings;
pub mod slug;
pub mod subscriber;
pub mod user;

pub use article::{ArticleService, ArticleServiceError};
pub use category::{CategoryService, CategoryServiceError};
pub use filter::{ArticleFilter, StatusFilter};
pub use markdown::MarkdownRenderer;
pub use password::{hash_password, verify_password};
pub use publish::PublishState;
pub use settings::{PublicSite, SettingsService, SettingsServiceError, SiteSettings, SiteSettingsUpdate};
pub use slug::{ensure_unique_slug, generate_slug, SlugProbe};
pub use subscriber::{SubscriberService, SubscriberServiceError};
pub use user::{AdminGate, UserService, UserServiceError};
