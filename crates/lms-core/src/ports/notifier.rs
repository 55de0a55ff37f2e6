//! Outbound user notifications

use async_trait::async_trait;

use crate::domain::User;
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_welcome(&self, user: &User) -> Result<(), DomainError>;
    async fn send_instructor_invite(&self, user: &User) -> Result<(), DomainError>;
}
