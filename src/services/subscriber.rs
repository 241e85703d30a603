//! Newsletter subscriber service

use crate::db::is_unique_violation;
use crate::db::repositories::SubscriberRepository;
use crate::models::NewsletterSubscriber;
use anyhow::Context;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SubscriberServiceError {
    #[error("Subscriber not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("This email is already subscribed to our newsletter.")]
    AlreadySubscribed,

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct SubscriberService {
    repo: Arc<dyn SubscriberRepository>,
}

impl SubscriberService {
    pub fn new(repo: Arc<dyn SubscriberRepository>) -> Self {
        Self { repo }
    }

    /// Sign an address up for the newsletter
    pub async fn subscribe(&self, email: &str) -> Result<NewsletterSubscriber, SubscriberServiceError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(SubscriberServiceError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }

        match self.repo.create(email).await {
            Ok(subscriber) => {
                tracing::info!("Newsletter subscriber added: {}", subscriber.id);
                Ok(subscriber)
            }
            Err(e) if is_unique_violation(&e) => Err(SubscriberServiceError::AlreadySubscribed),
            Err(e) => Err(e.into()),
        }
    }

    /// Subscribers, newest first
    pub async fn list(&self) -> Result<Vec<NewsletterSubscriber>, SubscriberServiceError> {
        Ok(self.repo.list().await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), SubscriberServiceError> {
        if !self.repo.delete(id).await.context("Failed to delete subscriber")? {
            return Err(SubscriberServiceError::NotFound(id.to_string()));
        }
        tracing::info!("Newsletter subscriber removed: {}", id);
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, SubscriberServiceError> {
        Ok(self.repo.count().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxSubscriberRepository;
    use crate::db::{create_test_pool, migrations};

    async fn setup_service() -> SubscriberService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SubscriberService::new(SqlxSubscriberRepository::boxed(pool))
    }

    #[tokio::test]
    async fn test_subscribe_trims_and_stores() {
        let service = setup_service().await;
        let sub = service.subscribe("  reader@news.test ").await.unwrap();
        assert_eq!(sub.email, "reader@news.test");
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_subscription_is_friendly_error() {
        let service = setup_service().await;
        service.subscribe("reader@news.test").await.unwrap();

        let err = service.subscribe("reader@news.test").await.unwrap_err();
        assert!(matches!(err, SubscriberServiceError::AlreadySubscribed));
        assert_eq!(err.to_string(), "This email is already subscribed to our newsletter.");
    }

    #[tokio::test]
    async fn test_empty_email_rejected() {
        let service = setup_service().await;
        let err = service.subscribe("   ").await.unwrap_err();
        assert!(matches!(err, SubscriberServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let service = setup_service().await;
        let a = service.subscribe("a@news.test").await.unwrap();
        service.subscribe("b@news.test").await.unwrap();

        let listed = service.list().await.unwrap();
        assert_eq!(listed[0].email, "b@news.test");

        service.delete(a.id).await.unwrap();
        assert_eq!(service.count().await.unwrap(), 1);
        assert!(matches!(
            service.delete(a.id).await.unwrap_err(),
            SubscriberServiceError::NotFound(_)
        ));
    }
}
