//! Data models
//!
//! This module contains the data structures used throughout Newsdesk:
//! - Database entities (Article, Category, NewsletterSubscriber, User, Session)
//! - Form payloads accepted by the admin API

mod article;
mod category;
mod session;
mod subscriber;
mod user;

pub use article::{Article, ArticleInput, CategorySummary};
pub use category::{Category, CategoryInput};
pub use session::Session;
pub use subscriber::NewsletterSubscriber;
pub use user::User;
