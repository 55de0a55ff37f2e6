//! Course and module repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Course, CourseStatus, Module, SearchHit, SearchScope};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Course>, DomainError>;
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Course>, DomainError>;
    async fn list(&self, status: Option<CourseStatus>) -> Result<Vec<Course>, DomainError>;
    async fn list_by_instructor(&self, instructor_id: &Uuid) -> Result<Vec<Course>, DomainError>;
    async fn count(&self, status: Option<CourseStatus>) -> Result<i64, DomainError>;
    async fn count_by_instructor(&self, instructor_id: &Uuid) -> Result<i64, DomainError>;

    async fn create(&self, course: &Course) -> Result<Course, DomainError>;
    async fn update_status(&self, id: &Uuid, status: CourseStatus) -> Result<Option<Course>, DomainError>;

    async fn count_modules(&self, course_id: &Uuid) -> Result<i64, DomainError>;
    async fn add_module(&self, module: &Module) -> Result<Module, DomainError>;

    /// Courses in `scope` whose title, description or category contains the pattern.
    async fn search_courses(&self, scope: SearchScope, pattern: &str, limit: i64) -> Result<Vec<SearchHit>, DomainError>;
    /// Modules of courses in `scope` whose title or notes contain the pattern.
    async fn search_modules(&self, scope: SearchScope, pattern: &str, limit: i64) -> Result<Vec<SearchHit>, DomainError>;
}
