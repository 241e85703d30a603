//! Session model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Signed-in session; the id doubles as the bearer token / cookie value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Start a session for `user_id` lasting `lifetime` from now
    ///
    /// Returns `None` when the expiry falls outside the representable range.
    pub fn start(user_id: i64, lifetime: Duration) -> Option<Self> {
        let now = Utc::now();
        let expires_at = now.checked_add_signed(lifetime)?;
        Some(Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            user_id,
            expires_at,
            created_at: now,
        })
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
