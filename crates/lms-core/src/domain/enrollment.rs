//! Enrollment of a student in a course

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentSource {
    /// The student enrolled themselves.
    #[serde(rename = "self")]
    SelfService,
    /// An admin assigned the course.
    Assigned,
}

impl EnrollmentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrollmentSource::SelfService => "self",
            EnrollmentSource::Assigned => "assigned",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "self" => Some(EnrollmentSource::SelfService),
            "assigned" => Some(EnrollmentSource::Assigned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub source: EnrollmentSource,
    pub enrolled_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn new(student_id: Uuid, course_id: Uuid, source: EnrollmentSource) -> Self {
        Self {
            student_id,
            course_id,
            source,
            enrolled_at: Utc::now(),
        }
    }
}

/// Bulk assignment request, already parsed.
#[derive(Debug, Clone, Default)]
pub struct CourseAssignment {
    pub group_ids: Vec<Uuid>,
    pub student_ids: Vec<Uuid>,
    pub course_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentOutcome {
    pub students: usize,
    pub courses: usize,
    pub new_enrollments: u64,
}
