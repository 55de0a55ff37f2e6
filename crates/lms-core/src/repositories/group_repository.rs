//! Group and membership repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Group, Membership, User};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Group>, DomainError>;
    async fn list(&self) -> Result<Vec<Group>, DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;

    /// Fails with `GroupNameAlreadyExists` when the name is taken.
    async fn create(&self, group: &Group) -> Result<Group, DomainError>;
    /// Inserts unless the name exists; returns whether a row was written.
    async fn insert_if_absent(&self, group: &Group) -> Result<bool, DomainError>;
    async fn update(&self, group: &Group) -> Result<Group, DomainError>;
    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError>;

    async fn list_memberships(&self, group_id: &Uuid) -> Result<Vec<(User, Membership)>, DomainError>;
    async fn memberships_for_user(&self, user_id: &Uuid) -> Result<Vec<Membership>, DomainError>;
    async fn count_memberships(&self, group_id: &Uuid) -> Result<i64, DomainError>;
    /// Fails with `AlreadyMember` when the pair exists.
    async fn add_membership(&self, membership: &Membership) -> Result<Membership, DomainError>;
    async fn remove_membership(&self, group_id: &Uuid, user_id: &Uuid) -> Result<bool, DomainError>;
}
