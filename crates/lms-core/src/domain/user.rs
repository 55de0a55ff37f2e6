// ============================================================================
// LMS Core - User Entity
// File: crates/lms-core/src/domain/user.rs
// ============================================================================
//! User domain entity, roles, and account status

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::group_name::normalize_group_name;

/// User role enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Instructor,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Instructor => "instructor",
            UserRole::Admin => "admin",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "student" => Some(UserRole::Student),
            "instructor" => Some(UserRole::Instructor),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Student
    }
}

/// Account status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Suspended => "suspended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(UserStatus::Active),
            "inactive" => Some(UserStatus::Inactive),
            "suspended" => Some(UserStatus::Suspended),
            _ => None,
        }
    }
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

/// User entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct User {
    pub id: Uuid,
    /// Subject of the external identity provider account.
    pub external_uid: Option<String>,

    #[validate(length(min = 1, max = 120, message = "Display name must be between 1 and 120 characters"))]
    pub display_name: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    pub role: UserRole,
    pub status: UserStatus,

    pub bio: Option<String>,

    #[validate(length(max = 100, message = "Headline must be at most 100 characters"))]
    pub headline: Option<String>,

    /// Normalized headline, equal to the name of the matching institutional group.
    #[validate(length(max = 100, message = "Headline must be at most 100 characters"))]
    pub headline_key: Option<String>,


    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub photo_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        external_uid: Option<String>,
        display_name: String,
        email: String,
        role: UserRole,
    ) -> Result<Self, validator::ValidationErrors> {
        let user = Self {
            id: Uuid::new_v4(),
            external_uid,
            display_name: display_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            role,
            status: UserStatus::Active,
            bio: None,
            headline: None,
            headline_key: None,
            linkedin: None,
            github: None,
            photo_url: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        user.validate()?;
        Ok(user)
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }

    /// Registration date on the UTC calendar.
    pub fn registered_on(&self) -> NaiveDate {
        lms_shared::utc_date(self.created_at)
    }

    /// Sets the headline and keeps `headline_key` in step with it.
    pub fn set_headline(&mut self, headline: Option<String>) {
        self.headline_key = headline
            .as_deref()
            .map(normalize_group_name)
            .filter(|key| !key.is_empty());
        self.headline = headline;
    }
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub headline: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub photo_url: Option<String>,
}

/// Filters for the admin user listing.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub email: Option<String>,
    pub role: Option<UserRole>,
}

/// Instructor-only profile data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorProfile {
    pub instructor_id: Uuid,
    pub subject: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> User {
        User::new(
            Some("uid-1".to_string()),
            "  Ada Lovelace ".to_string(),
            "Ada@Example.com".to_string(),
            UserRole::Student,
        )
        .unwrap()
    }

    #[test]
    fn test_create_user_normalizes_fields() {
        let user = student();
        assert_eq!(user.display_name, "Ada Lovelace");
        assert_eq!(user.email, "ada@example.com");
        assert!(user.is_active());
        assert!(user.is_student());
    }

    #[test]
    fn test_create_user_rejects_bad_email() {
        let result = User::new(None, "Ada".to_string(), "nope".to_string(), UserRole::Student);
        assert!(result.is_err());
    }

    #[test]
    fn test_set_headline_tracks_key() {
        let mut user = student();
        user.set_headline(Some("abc college, pune".to_string()));
        assert_eq!(user.headline_key.as_deref(), Some("ABC COLLEGE PUNE"));

        user.set_headline(Some("--".to_string()));
        assert_eq!(user.headline_key, None);

        user.set_headline(None);
        assert_eq!(user.headline, None);
        assert_eq!(user.headline_key, None);
    }

    #[test]
    fn test_headline_longer_than_group_name_is_invalid() {
        let mut user = student();
        user.set_headline(Some("a".repeat(100)));
        assert!(user.validate().is_ok());

        user.set_headline(Some("a".repeat(101)));
        assert!(user.validate().is_err());

        // Uppercasing can lengthen the key past the group name limit.
        user.set_headline(Some("ß".repeat(60)));
        assert_eq!(user.headline_key.as_ref().map(|k| k.chars().count()), Some(120));
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_role_round_trip_strings() {
        for role in [UserRole::Student, UserRole::Instructor, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()), Some(role));
        }
        assert_eq!(UserStatus::from_str("banned"), None);
    }
}
