// ============================================================================
// LMS Infrastructure - PostgreSQL Enrollment Repository
// File: crates/lms-infrastructure/src/database/postgres/enrollment_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use lms_core::domain::{Course, Enrollment, EnrollmentSource};
use lms_core::error::DomainError;
use lms_core::repositories::EnrollmentRepository;

use super::course_repo_impl::{CourseRow, COURSE_SELECT};

pub struct PgEnrollmentRepository {
    pool: PgPool,
}

impl PgEnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[async_trait]
impl EnrollmentRepository for PgEnrollmentRepository {
    async fn enroll(&self, enrollment: &Enrollment) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO enrollments (student_id, course_id, source, enrolled_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (student_id, course_id) DO NOTHING
            "#,
        )
        .bind(enrollment.student_id)
        .bind(enrollment.course_id)
        .bind(enrollment.source.as_str())
        .bind(enrollment.enrolled_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("enrolling student", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn enroll_many(
        &self,
        student_ids: &[Uuid],
        course_ids: &[Uuid],
        source: EnrollmentSource,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO enrollments (student_id, course_id, source)
            SELECT s.id, c.id, $3::text
            FROM UNNEST($1::uuid[]) AS s(id)
            CROSS JOIN UNNEST($2::uuid[]) AS c(id)
            ON CONFLICT (student_id, course_id) DO NOTHING
            "#,
        )
        .bind(student_ids)
        .bind(course_ids)
        .bind(source.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("assigning courses", e))?;

        info!("Bulk enrollment wrote {} row(s)", result.rows_affected());
        Ok(result.rows_affected())
    }

    async fn list_courses_for_student(&self, student_id: &Uuid) -> Result<Vec<Course>, DomainError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            r#"
            {COURSE_SELECT}
            JOIN enrollments e ON e.course_id = c.id
            WHERE e.student_id = $1
            ORDER BY e.enrolled_at DESC
            "#
        ))
        .bind(student_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing student courses", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count_students_for_instructor(&self, instructor_id: &Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(DISTINCT e.student_id)
            FROM enrollments e
            JOIN courses c ON c.id = e.course_id
            WHERE c.instructor_id = $1
            "#,
        )
        .bind(instructor_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("counting instructor students", e))
    }
}
