//! External identity provider (account administration only)

use async_trait::async_trait;

use crate::error::DomainError;

#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Creates a sign-in account and returns its subject id.
    async fn create_account(&self, email: &str, display_name: &str) -> Result<String, DomainError>;
}
