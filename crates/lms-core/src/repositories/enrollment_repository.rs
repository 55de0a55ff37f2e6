//! Enrollment repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Course, Enrollment, EnrollmentSource};
use crate::error::DomainError;

#[cfg_attr(any(test, feature = "test-support"), mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Returns `false` when the student already had the course.
    async fn enroll(&self, enrollment: &Enrollment) -> Result<bool, DomainError>;
    /// Enrolls every student in every course, skipping existing pairs.
    /// Returns the number of rows written.
    async fn enroll_many(
        &self,
        student_ids: &[Uuid],
        course_ids: &[Uuid],
        source: EnrollmentSource,
    ) -> Result<u64, DomainError>;
    async fn list_courses_for_student(&self, student_id: &Uuid) -> Result<Vec<Course>, DomainError>;
    async fn count_students_for_instructor(&self, instructor_id: &Uuid) -> Result<i64, DomainError>;
}
