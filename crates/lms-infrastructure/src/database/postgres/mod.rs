//! PostgreSQL repository implementations

pub mod user_repo_impl;
pub mod group_repo_impl;
pub mod course_repo_impl;
pub mod enrollment_repo_impl;

pub use user_repo_impl::PgUserRepository;
pub use group_repo_impl::PgGroupRepository;
pub use course_repo_impl::PgCourseRepository;
pub use enrollment_repo_impl::PgEnrollmentRepository;

/// Postgres `unique_violation`.
pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .map_or(false, |db| db.is_unique_violation())
}
