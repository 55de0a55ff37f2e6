// ============================================================================
// LMS Infrastructure - PostgreSQL User Repository
// File: crates/lms-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use lms_core::domain::{InstructorProfile, User, UserFilter, UserRole, UserStatus};
use lms_core::error::DomainError;
use lms_core::repositories::UserRepository;

use super::is_unique_violation;

const USER_COLUMNS: &str = r#"
    id, external_uid, display_name, email, role, status,
    bio, headline, headline_key, linkedin, github, photo_url,
    created_at, updated_at
"#;

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub external_uid: Option<String>,
    pub display_name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub bio: Option<String>,
    pub headline: Option<String>,
    pub headline_key: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            external_uid: row.external_uid,
            display_name: row.display_name,
            email: row.email,
            role: UserRole::from_str(&row.role).unwrap_or_default(),
            status: UserStatus::from_str(&row.status).unwrap_or_default(),
            bio: row.bio,
            headline: row.headline,
            headline_key: row.headline_key,
            linkedin: row.linkedin,
            github: row.github,
            photo_url: row.photo_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding user by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_external_uid(&self, external_uid: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE external_uid = $1"))
                .bind(external_uid)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding user by external uid", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding user by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"))
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("finding users by ids", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE ($1::text IS NULL OR POSITION(LOWER($1) IN LOWER(email)) > 0)
              AND ($2::text IS NULL OR role = $2)
            ORDER BY created_at DESC
            "#
        ))
        .bind(filter.email.as_deref())
        .bind(filter.role.map(|r| r.as_str()))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing users", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn list_students_registered_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE role = 'student'
              AND (created_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
            ORDER BY created_at
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing students by registration date", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count_students_registered_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<i64, DomainError> {
        sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM users
            WHERE role = 'student'
              AND (created_at AT TIME ZONE 'UTC')::date BETWEEN $1 AND $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("counting students by registration date", e))
    }

    async fn list_students_by_headline_key(&self, key: &str) -> Result<Vec<User>, DomainError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = 'student' AND headline_key = $1 ORDER BY created_at"
        ))
        .bind(key)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing students by institution", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count_students_by_headline_key(&self, key: &str) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'student' AND headline_key = $1")
            .bind(key)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting students by institution", e))
    }

    async fn count_by_role(&self, role: UserRole) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting users by role", e))
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        info!("Creating {} account for {}", user.role.as_str(), lms_shared::utils::mask_email(&user.email));

        let row: UserRow = insert_user(user)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| insert_error(user, e))?;

        Ok(row.into())
    }

    async fn create_instructor(&self, user: &User, profile: &InstructorProfile) -> Result<User, DomainError> {
        info!("Creating instructor account for {}", lms_shared::utils::mask_email(&user.email));

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting transaction", e))?;

        let row: UserRow = insert_user(user)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| insert_error(user, e))?;

        sqlx::query(
            r#"
            INSERT INTO instructor_profiles (instructor_id, subject, phone, bio)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(profile.instructor_id)
        .bind(&profile.subject)
        .bind(&profile.phone)
        .bind(&profile.bio)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("creating instructor profile", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("committing instructor", e))?;

        Ok(row.into())
    }

    async fn update_profile(&self, user: &User) -> Result<User, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE users SET
                display_name = $2, bio = $3, headline = $4, headline_key = $5,
                linkedin = $6, github = $7, photo_url = $8, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.display_name)
        .bind(&user.bio)
        .bind(&user.headline)
        .bind(&user.headline_key)
        .bind(&user.linkedin)
        .bind(&user.github)
        .bind(&user.photo_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("updating profile", e))?;

        row.map(|r| r.into()).ok_or(DomainError::UserNotFound(user.id))
    }

    async fn update_status(&self, id: &Uuid, status: UserStatus) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("updating user status", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn update_role(&self, id: &Uuid, role: UserRole) -> Result<Option<User>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "UPDATE users SET role = $2, updated_at = NOW() WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(role.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("updating user role", e))?;

        Ok(row.map(|r| r.into()))
    }
}

fn insert_user(user: &User) -> sqlx::query::QueryAs<'_, sqlx::Postgres, UserRow, sqlx::postgres::PgArguments> {
    sqlx::query_as(INSERT_USER)
        .bind(user.id)
        .bind(&user.external_uid)
        .bind(&user.display_name)
        .bind(&user.email)
        .bind(user.role.as_str())
        .bind(user.status.as_str())
        .bind(&user.bio)
        .bind(&user.headline)
        .bind(&user.headline_key)
        .bind(&user.linkedin)
        .bind(&user.github)
        .bind(&user.photo_url)
        .bind(user.created_at)
}

const INSERT_USER: &str = r#"
    INSERT INTO users (
        id, external_uid, display_name, email, role, status,
        bio, headline, headline_key, linkedin, github, photo_url, created_at
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
    RETURNING
        id, external_uid, display_name, email, role, status,
        bio, headline, headline_key, linkedin, github, photo_url,
        created_at, updated_at
"#;

fn insert_error(user: &User, e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        error!("Duplicate account for {}: {}", lms_shared::utils::mask_email(&user.email), e);
        DomainError::EmailAlreadyExists(user.email.clone())
    } else {
        db_error("creating user", e)
    }
}
