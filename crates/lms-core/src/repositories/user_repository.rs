//! User repository trait (port)

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{InstructorProfile, User, UserFilter, UserRole, UserStatus};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError>;
    async fn find_by_external_uid(&self, external_uid: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError>;
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError>;

    /// Students whose UTC registration date lies in `[start, end]`.
    async fn list_students_registered_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<User>, DomainError>;
    async fn count_students_registered_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, DomainError>;

    /// Students whose normalized headline equals `key`.
    async fn list_students_by_headline_key(&self, key: &str) -> Result<Vec<User>, DomainError>;
    async fn count_students_by_headline_key(&self, key: &str) -> Result<i64, DomainError>;

    async fn count_by_role(&self, role: UserRole) -> Result<i64, DomainError>;

    async fn create(&self, user: &User) -> Result<User, DomainError>;
    /// Writes the user and the instructor profile in one transaction.
    async fn create_instructor(&self, user: &User, profile: &InstructorProfile) -> Result<User, DomainError>;
    async fn update_profile(&self, user: &User) -> Result<User, DomainError>;
    async fn update_status(&self, id: &Uuid, status: UserStatus) -> Result<Option<User>, DomainError>;
    async fn update_role(&self, id: &Uuid, role: UserRole) -> Result<Option<User>, DomainError>;
}
