//! Dashboard counters

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminStats {
    pub total_students: i64,
    pub total_instructors: i64,
    pub total_courses: i64,
    pub pending_courses: i64,
    pub total_groups: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorStats {
    pub total_courses: i64,
    pub total_students: i64,
}
