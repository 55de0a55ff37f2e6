//! Repository traits (ports)

pub mod user_repository;
pub mod group_repository;
pub mod course_repository;
pub mod enrollment_repository;

pub use user_repository::UserRepository;
pub use group_repository::GroupRepository;
pub use course_repository::CourseRepository;
pub use enrollment_repository::EnrollmentRepository;

#[cfg(any(test, feature = "test-support"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-support"))]
pub use group_repository::MockGroupRepository;
#[cfg(any(test, feature = "test-support"))]
pub use course_repository::MockCourseRepository;
#[cfg(any(test, feature = "test-support"))]
pub use enrollment_repository::MockEnrollmentRepository;
