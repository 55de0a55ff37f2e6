use chrono::{DateTime, Utc};
use lms_core::domain::{User, UserRole, UserStatus};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User as exposed over HTTP. Identity-provider ids stay internal.
#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            email: user.email,
            role: user.role,
            status: user.status,
            bio: user.bio,
            headline: user.headline,
            linkedin: user.linkedin,
            github: user.github,
            photo_url: user.photo_url,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: UserRole,
}

pub use lms_core::services::NewInstructor as InstructorRequest;
