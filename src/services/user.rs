//! User service
//!
//! Sign-in, sign-out and session validation for back-office staff, plus the
//! admin allow-list gate:
//! - Registration is only open while no account exists (first-run bootstrap)
//! - Sessions are random tokens that expire after `auth.session_days`
//! - Admin access is decided by email against the configured allow-list

use crate::db::is_unique_violation;
use crate::db::repositories::{SessionRepository, UserRepository};
use crate::models::{Session, User};
use crate::services::password::{hash_password, verify_password};
use anyhow::Context;
use chrono::Duration;
use std::collections::HashSet;
use std::sync::Arc;

/// Error types for user service operations
#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    /// Unknown email or wrong password; the two are not distinguished
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Registration is closed")]
    RegistrationClosed,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Email '{0}' is already registered")]
    DuplicateEmail(String),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// User service for accounts and sessions
pub struct UserService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    session_days: i64,
}

impl UserService {
    pub fn with_session_days(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        session_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_days,
        }
    }

    /// Create the first account.
    ///
    /// Once any user exists this returns `RegistrationClosed`.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, UserServiceError> {
        let email = email.trim();
        validate_credentials(email, password)?;

        if self.user_repo.count().await.context("Failed to count users")? > 0 {
            return Err(UserServiceError::RegistrationClosed);
        }

        let password_hash = hash_password(password).context("Failed to hash password")?;
        let user = User::new(email.to_string(), password_hash);

        match self.user_repo.create(&user).await {
            Ok(created) => {
                tracing::info!("User registered: {}", created.id);
                Ok(created)
            }
            Err(e) if is_unique_violation(&e) => Err(UserServiceError::DuplicateEmail(email.to_string())),
            Err(e) => Err(e.context("Failed to create user").into()),
        }
    }

    /// Verify credentials and open a new session
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, UserServiceError> {
        let user = self
            .user_repo
            .get_by_email(email.trim())
            .await
            .context("Failed to get user by email")?
            .ok_or(UserServiceError::InvalidCredentials)?;

        let valid = verify_password(password, &user.password_hash).context("Failed to verify password")?;
        if !valid {
            tracing::warn!("Failed sign-in for user {}", user.id);
            return Err(UserServiceError::InvalidCredentials);
        }

        let session = Duration::try_days(self.session_days)
            .and_then(|lifetime| Session::start(user.id, lifetime))
            .ok_or_else(|| anyhow::anyhow!("Session lifetime of {} days is out of range", self.session_days))?;
        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        tracing::info!("User {} signed in", user.id);
        Ok(created)
    }

    /// Drop a session; unknown tokens are ignored
    pub async fn sign_out(&self, token: &str) -> Result<(), UserServiceError> {
        self.session_repo
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Resolve a session token to its user.
    ///
    /// Expired sessions are removed and treated as absent.
    pub async fn validate_session(&self, token: &str) -> Result<Option<User>, UserServiceError> {
        let session = match self
            .session_repo
            .get_by_id(token)
            .await
            .context("Failed to get session")?
        {
            Some(s) => s,
            None => return Ok(None),
        };

        if session.is_expired() {
            if let Err(e) = self.session_repo.delete(token).await {
                tracing::warn!("Failed to remove expired session: {:#}", e);
            }
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to get user")?;
        Ok(user)
    }

    pub async fn cleanup_expired_sessions(&self) -> Result<u64, UserServiceError> {
        let removed = self
            .session_repo
            .delete_expired()
            .await
            .context("Failed to delete expired sessions")?;
        Ok(removed)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), UserServiceError> {
    if email.is_empty() {
        return Err(UserServiceError::ValidationError("Email cannot be empty".to_string()));
    }
    if !email.contains('@') {
        return Err(UserServiceError::ValidationError("Invalid email format".to_string()));
    }
    if password.is_empty() {
        return Err(UserServiceError::ValidationError("Password cannot be empty".to_string()));
    }
    Ok(())
}

/// Email allow-list deciding who may use the admin API
#[derive(Debug, Clone)]
pub struct AdminGate {
    allow_list: HashSet<String>,
}

impl AdminGate {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allow_list = emails
            .into_iter()
            .map(|e| normalize_email(e.as_ref()))
            .filter(|e| !e.is_empty())
            .collect();
        Self { allow_list }
    }

    pub fn is_admin(&self, user: &User) -> bool {
        self.allow_list.contains(&normalize_email(&user.email))
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
