//! User model
//!
//! Users are staff accounts that can sign in to the back office. Whether a
//! signed-in user may administer the site is decided by the configured
//! admin allow-list, not by anything stored on the user row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Staff account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: i64,
    /// Email address (unique, used to sign in)
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user.
    ///
    /// The password must already be hashed with `services::password::hash_password()`.
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: 0, // Will be set by the database
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User::new("desk@news.test".into(), "$argon2id$secret".into());
        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("desk@news.test"));
        assert!(!json.contains("argon2id"));
    }
}
