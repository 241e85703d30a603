//! Newsletter subscriber model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reader signed up for the newsletter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    pub id: i64,
    /// Email address (unique)
    pub email: String,
    pub subscribed_at: DateTime<Utc>,
}
