// ============================================================================
// LMS Core - Course & Module Entities
// File: crates/lms-core/src/domain/course.rs
// ============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::DomainError;

/// Review status of a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    Pending,
    Approved,
    Rejected,
}

impl CourseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseStatus::Pending => "pending",
            CourseStatus::Approved => "approved",
            CourseStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(CourseStatus::Pending),
            "approved" => Some(CourseStatus::Approved),
            "rejected" => Some(CourseStatus::Rejected),
            _ => None,
        }
    }
}

impl Default for CourseStatus {
    fn default() -> Self {
        CourseStatus::Pending
    }
}

/// Unit of a course's validity period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidityUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl ValidityUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidityUnit::Days => "days",
            ValidityUnit::Weeks => "weeks",
            ValidityUnit::Months => "months",
            ValidityUnit::Years => "years",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "days" => Some(ValidityUnit::Days),
            "weeks" => Some(ValidityUnit::Weeks),
            "months" => Some(ValidityUnit::Months),
            "years" => Some(ValidityUnit::Years),
            _ => None,
        }
    }
}

/// Course entity
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Course {
    pub id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Course title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description too long"))]
    pub description: Option<String>,

    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub thumbnail_url: Option<String>,
    pub status: CourseStatus,

    /// How long access lasts, e.g. "6 months". Set together with the unit.
    #[validate(range(min = 1, message = "Validity must be at least 1"))]
    pub validity_value: Option<i32>,
    pub validity_unit: Option<ValidityUnit>,
    pub expires_at: Option<DateTime<Utc>>,

    pub instructor_id: Uuid,
    /// Filled by listings that join the owner.
    pub instructor_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Course {
    pub fn new(
        instructor_id: Uuid,
        title: String,
        description: Option<String>,
        category: Option<String>,
        difficulty: Option<String>,
        thumbnail_url: Option<String>,
    ) -> Result<Self, validator::ValidationErrors> {
        let course = Self {
            id: Uuid::new_v4(),
            title: title.trim().to_string(),
            description: description.map(|d| d.trim().to_string()),
            category: category.map(|c| c.trim().to_string()),
            difficulty: difficulty.map(|d| d.trim().to_lowercase()),
            thumbnail_url,
            status: CourseStatus::Pending,
            validity_value: None,
            validity_unit: None,
            expires_at: None,
            instructor_id,
            instructor_name: None,
            created_at: Utc::now(),
            updated_at: None,
        };

        course.validate()?;
        Ok(course)
    }

    /// Sets the validity period and the optional expiry. Value and unit
    /// come as a pair and the expiry must lie after creation.
    pub fn with_validity(
        mut self,
        value: Option<i32>,
        unit: Option<ValidityUnit>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Self, DomainError> {
        if value.is_some() != unit.is_some() {
            return Err(DomainError::validation(
                "Validity value and unit must be given together",
            ));
        }
        if expires_at.is_some_and(|at| at <= self.created_at) {
            return Err(DomainError::validation("Expiry must be in the future"));
        }

        self.validity_value = value;
        self.validity_unit = unit;
        self.expires_at = expires_at;
        self.validate()?;
        Ok(self)
    }

    pub fn is_visible(&self) -> bool {
        self.status == CourseStatus::Approved
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.instructor_id == user_id
    }
}

/// Module entity; belongs to exactly one course.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Module {
    pub id: Uuid,
    pub course_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Module title must be between 1 and 200 characters"))]
    pub title: String,

    pub notes: Option<String>,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl Module {
    pub fn new(
        course_id: Uuid,
        title: String,
        notes: Option<String>,
        position: i32,
    ) -> Result<Self, validator::ValidationErrors> {
        let module = Self {
            id: Uuid::new_v4(),
            course_id,
            title: title.trim().to_string(),
            notes,
            position,
            created_at: Utc::now(),
        };

        module.validate()?;
        Ok(module)
    }
}
