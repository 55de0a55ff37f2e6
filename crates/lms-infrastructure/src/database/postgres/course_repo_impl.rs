// ============================================================================
// LMS Infrastructure - PostgreSQL Course Repository
// File: crates/lms-infrastructure/src/database/postgres/course_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use lms_core::domain::{
    Course, CourseStatus, Module, SearchHit, SearchHitKind, SearchScope, ValidityUnit,
};
use lms_core::error::DomainError;
use lms_core::repositories::CourseRepository;

/// Course columns joined with the owner's display name. Expects `courses c`
/// and `users u` in the FROM clause.
pub(crate) const COURSE_SELECT: &str = r#"
    SELECT
        c.id, c.title, c.description, c.category, c.difficulty, c.thumbnail_url,
        c.status, c.validity_value, c.validity_unit, c.expires_at,
        c.instructor_id, u.display_name AS instructor_name,
        c.created_at, c.updated_at
    FROM courses c
    JOIN users u ON u.id = c.instructor_id
"#;

pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub thumbnail_url: Option<String>,
    pub status: String,
    pub validity_value: Option<i32>,
    pub validity_unit: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub instructor_id: Uuid,
    pub instructor_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            difficulty: row.difficulty,
            thumbnail_url: row.thumbnail_url,
            status: CourseStatus::from_str(&row.status).unwrap_or_default(),
            validity_value: row.validity_value,
            validity_unit: row.validity_unit.as_deref().and_then(ValidityUnit::from_str),
            expires_at: row.expires_at,
            instructor_id: row.instructor_id,
            instructor_name: row.instructor_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct ModuleRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub notes: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ModuleRow> for Module {
    fn from(row: ModuleRow) -> Self {
        Module {
            id: row.id,
            course_id: row.course_id,
            title: row.title,
            notes: row.notes,
            position: row.position,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SearchHitRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub status: String,
    pub difficulty: Option<String>,
    pub thumbnail_url: Option<String>,
    pub validity_value: Option<i32>,
    pub validity_unit: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub instructor_id: Uuid,
    pub instructor_name: Option<String>,
    pub course_id: Uuid,
    pub course_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SearchHitRow {
    fn into_hit(self, kind: SearchHitKind) -> SearchHit {
        SearchHit {
            id: self.id,
            kind,
            title: self.title,
            description: self.description,
            category: self.category,
            status: CourseStatus::from_str(&self.status).unwrap_or_default(),
            difficulty: self.difficulty,
            thumbnail_url: self.thumbnail_url,
            validity_value: self.validity_value,
            validity_unit: self.validity_unit.as_deref().and_then(ValidityUnit::from_str),
            expires_at: self.expires_at,
            instructor_id: self.instructor_id,
            instructor_name: self.instructor_name,
            course_id: self.course_id,
            course_title: self.course_title,
            created_at: self.created_at,
        }
    }
}

/// `None` selects the approved catalog, `Some(id)` one instructor's courses.
fn scope_owner(scope: SearchScope) -> Option<Uuid> {
    match scope {
        SearchScope::Catalog => None,
        SearchScope::Instructor(id) => Some(id),
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Course>, DomainError> {
        let row: Option<CourseRow> = sqlx::query_as(&format!("{COURSE_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding course", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Course>, DomainError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!("{COURSE_SELECT} WHERE c.id = ANY($1)"))
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("finding courses by ids", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list(&self, status: Option<CourseStatus>) -> Result<Vec<Course>, DomainError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "{COURSE_SELECT} WHERE ($1::text IS NULL OR c.status = $1) ORDER BY c.created_at DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing courses", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_by_instructor(&self, instructor_id: &Uuid) -> Result<Vec<Course>, DomainError> {
        let rows: Vec<CourseRow> = sqlx::query_as(&format!(
            "{COURSE_SELECT} WHERE c.instructor_id = $1 ORDER BY c.created_at DESC"
        ))
        .bind(instructor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing instructor courses", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count(&self, status: Option<CourseStatus>) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE ($1::text IS NULL OR status = $1)")
            .bind(status.map(|s| s.as_str()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting courses", e))
    }

    async fn count_by_instructor(&self, instructor_id: &Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE instructor_id = $1")
            .bind(instructor_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting instructor courses", e))
    }

    async fn create(&self, course: &Course) -> Result<Course, DomainError> {
        info!("Creating course '{}' for instructor {}", course.title, course.instructor_id);

        let row: CourseRow = sqlx::query_as(
            r#"
            WITH inserted AS (
                INSERT INTO courses (
                    id, title, description, category, difficulty, thumbnail_url,
                    status, validity_value, validity_unit, expires_at,
                    instructor_id, created_at
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
                RETURNING *
            )
            SELECT
                c.id, c.title, c.description, c.category, c.difficulty, c.thumbnail_url,
                c.status, c.validity_value, c.validity_unit, c.expires_at,
                c.instructor_id, u.display_name AS instructor_name,
                c.created_at, c.updated_at
            FROM inserted c
            JOIN users u ON u.id = c.instructor_id
            "#,
        )
        .bind(course.id)
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.category)
        .bind(&course.difficulty)
        .bind(&course.thumbnail_url)
        .bind(course.status.as_str())
        .bind(course.validity_value)
        .bind(course.validity_unit.map(|u| u.as_str()))
        .bind(course.expires_at)
        .bind(course.instructor_id)
        .bind(course.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating course", e))?;

        Ok(row.into())
    }

    async fn update_status(&self, id: &Uuid, status: CourseStatus) -> Result<Option<Course>, DomainError> {
        let updated = sqlx::query("UPDATE courses SET status = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("updating course status", e))?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    async fn count_modules(&self, course_id: &Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM modules WHERE course_id = $1")
            .bind(course_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting modules", e))
    }

    async fn add_module(&self, module: &Module) -> Result<Module, DomainError> {
        let row: ModuleRow = sqlx::query_as(
            r#"
            INSERT INTO modules (id, course_id, title, notes, position, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, course_id, title, notes, position, created_at
            "#,
        )
        .bind(module.id)
        .bind(module.course_id)
        .bind(&module.title)
        .bind(&module.notes)
        .bind(module.position)
        .bind(module.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("adding module", e))?;

        Ok(row.into())
    }

    async fn search_courses(&self, scope: SearchScope, pattern: &str, limit: i64) -> Result<Vec<SearchHit>, DomainError> {
        let rows: Vec<SearchHitRow> = sqlx::query_as(
            r#"
            SELECT
                c.id, c.title, c.description, c.category, c.status, c.difficulty,
                c.thumbnail_url, c.validity_value, c.validity_unit, c.expires_at,
                c.instructor_id, u.display_name AS instructor_name,
                c.id AS course_id, NULL::text AS course_title, c.created_at
            FROM courses c
            JOIN users u ON u.id = c.instructor_id
            WHERE (($1::uuid IS NULL AND c.status = 'approved') OR c.instructor_id = $1)
              AND (c.title ILIKE $2 ESCAPE '\'
                   OR c.description ILIKE $2 ESCAPE '\'
                   OR c.category ILIKE $2 ESCAPE '\')
            ORDER BY c.created_at DESC
            LIMIT $3
            "#,
        )
        .bind(scope_owner(scope))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("searching courses", e))?;

        Ok(rows.into_iter().map(|r| r.into_hit(SearchHitKind::Course)).collect())
    }

    async fn search_modules(&self, scope: SearchScope, pattern: &str, limit: i64) -> Result<Vec<SearchHit>, DomainError> {
        let rows: Vec<SearchHitRow> = sqlx::query_as(
            r#"
            SELECT
                m.id, m.title, m.notes AS description, c.category, c.status, c.difficulty,
                c.thumbnail_url, c.validity_value, c.validity_unit, c.expires_at,
                c.instructor_id, u.display_name AS instructor_name,
                c.id AS course_id, c.title AS course_title, m.created_at
            FROM modules m
            JOIN courses c ON c.id = m.course_id
            JOIN users u ON u.id = c.instructor_id
            WHERE (($1::uuid IS NULL AND c.status = 'approved') OR c.instructor_id = $1)
              AND (m.title ILIKE $2 ESCAPE '\' OR m.notes ILIKE $2 ESCAPE '\')
            ORDER BY m.created_at DESC
            LIMIT $3
            "#,
        )
        .bind(scope_owner(scope))
        .bind(pattern)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("searching modules", e))?;

        Ok(rows.into_iter().map(|r| r.into_hit(SearchHitKind::Module)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_owner() {
        let id = Uuid::new_v4();
        assert_eq!(scope_owner(SearchScope::Catalog), None);
        assert_eq!(scope_owner(SearchScope::Instructor(id)), Some(id));
    }

    fn row(unit: Option<&str>) -> CourseRow {
        CourseRow {
            id: Uuid::new_v4(),
            title: "Rust".to_string(),
            description: None,
            category: None,
            difficulty: None,
            thumbnail_url: None,
            status: "approved".to_string(),
            validity_value: unit.map(|_| 6),
            validity_unit: unit.map(str::to_string),
            expires_at: None,
            instructor_id: Uuid::new_v4(),
            instructor_name: Some("Grace".to_string()),
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn test_course_row_maps_validity() {
        let course: Course = row(Some("months")).into();
        assert_eq!(course.status, CourseStatus::Approved);
        assert_eq!(course.validity_value, Some(6));
        assert_eq!(course.validity_unit, Some(ValidityUnit::Months));

        let course: Course = row(None).into();
        assert_eq!(course.validity_value, None);
        assert_eq!(course.validity_unit, None);
    }
}
