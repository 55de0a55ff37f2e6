// ============================================================================
// LMS Infrastructure - PostgreSQL Group Repository
// File: crates/lms-infrastructure/src/database/postgres/group_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use lms_core::domain::{Group, Membership, User};
use lms_core::error::DomainError;
use lms_core::repositories::GroupRepository;

use super::is_unique_violation;
use super::user_repo_impl::UserRow;

pub struct PgGroupRepository {
    pool: PgPool,
}

impl PgGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    pub id: Uuid,
    pub name: String,
    pub created_by: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<GroupRow> for Group {
    fn from(row: GroupRow) -> Self {
        Group {
            id: row.id,
            name: row.name,
            created_by: row.created_by,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct MembershipRow {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<MembershipRow> for Membership {
    fn from(row: MembershipRow) -> Self {
        Membership {
            group_id: row.group_id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
        }
    }
}

// A member listing row: the user plus the membership columns, aliased.
#[derive(Debug, FromRow)]
struct MemberRow {
    #[sqlx(flatten)]
    pub user: UserRow,
    pub group_id: Uuid,
    pub membership_start: Option<NaiveDate>,
    pub membership_end: Option<NaiveDate>,
    pub joined_at: DateTime<Utc>,
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

fn name_error(group: &Group, e: sqlx::Error) -> DomainError {
    if is_unique_violation(&e) {
        DomainError::GroupNameAlreadyExists(group.name.clone())
    } else {
        db_error("writing group", e)
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Group>, DomainError> {
        let row: Option<GroupRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_by, start_date, end_date, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding group", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        let rows: Vec<GroupRow> = sqlx::query_as(
            r#"
            SELECT id, name, created_by, start_date, end_date, created_at, updated_at
            FROM groups
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing groups", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count(&self) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM groups")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting groups", e))
    }

    async fn create(&self, group: &Group) -> Result<Group, DomainError> {
        info!("Creating {} group {}", group.kind().as_str(), group.name);

        let row: GroupRow = sqlx::query_as(
            r#"
            INSERT INTO groups (id, name, created_by, start_date, end_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, created_by, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(group.created_by)
        .bind(group.start_date)
        .bind(group.end_date)
        .bind(group.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| name_error(group, e))?;

        Ok(row.into())
    }

    async fn insert_if_absent(&self, group: &Group) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO groups (id, name, created_by, start_date, end_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(group.created_by)
        .bind(group.start_date)
        .bind(group.end_date)
        .bind(group.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("inserting group", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn update(&self, group: &Group) -> Result<Group, DomainError> {
        let row: Option<GroupRow> = sqlx::query_as(
            r#"
            UPDATE groups
            SET name = $2, start_date = $3, end_date = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_by, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(group.id)
        .bind(&group.name)
        .bind(group.start_date)
        .bind(group.end_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| name_error(group, e))?;

        row.map(|r| r.into()).ok_or(DomainError::GroupNotFound(group.id))
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, DomainError> {
        // Memberships go with the group (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting group", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_memberships(&self, group_id: &Uuid) -> Result<Vec<(User, Membership)>, DomainError> {
        let rows: Vec<MemberRow> = sqlx::query_as(
            r#"
            SELECT
                u.id, u.external_uid, u.display_name, u.email, u.role, u.status,
                u.bio, u.headline, u.headline_key, u.linkedin, u.github, u.photo_url,
                u.created_at, u.updated_at,
                m.group_id, m.start_date AS membership_start, m.end_date AS membership_end,
                m.created_at AS joined_at
            FROM memberships m
            JOIN users u ON u.id = m.user_id
            WHERE m.group_id = $1
            ORDER BY u.display_name
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing memberships", e))?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let membership = Membership {
                    group_id: row.group_id,
                    user_id: row.user.id,
                    start_date: row.membership_start,
                    end_date: row.membership_end,
                    created_at: row.joined_at,
                };
                (row.user.into(), membership)
            })
            .collect())
    }

    async fn memberships_for_user(&self, user_id: &Uuid) -> Result<Vec<Membership>, DomainError> {
        let rows: Vec<MembershipRow> = sqlx::query_as(
            r#"
            SELECT group_id, user_id, start_date, end_date, created_at
            FROM memberships
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing user memberships", e))?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    async fn count_memberships(&self, group_id: &Uuid) -> Result<i64, DomainError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM memberships WHERE group_id = $1")
            .bind(group_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting memberships", e))
    }

    async fn add_membership(&self, membership: &Membership) -> Result<Membership, DomainError> {
        let row: MembershipRow = sqlx::query_as(
            r#"
            INSERT INTO memberships (group_id, user_id, start_date, end_date, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING group_id, user_id, start_date, end_date, created_at
            "#,
        )
        .bind(membership.group_id)
        .bind(membership.user_id)
        .bind(membership.start_date)
        .bind(membership.end_date)
        .bind(membership.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                DomainError::AlreadyMember {
                    group_id: membership.group_id,
                    user_id: membership.user_id,
                }
            } else {
                db_error("adding membership", e)
            }
        })?;

        Ok(row.into())
    }

    async fn remove_membership(&self, group_id: &Uuid, user_id: &Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM memberships WHERE group_id = $1 AND user_id = $2")
            .bind(group_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("removing membership", e))?;

        Ok(result.rows_affected() > 0)
    }
}
