use lms_core::domain::{CourseAssignment, CourseStatus};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    pub status: Option<CourseStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ReviewCourseRequest {
    pub status: CourseStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct AssignCoursesRequest {
    #[serde(default)]
    pub group_ids: Vec<Uuid>,
    #[serde(default)]
    pub student_ids: Vec<Uuid>,
    #[serde(default)]
    pub course_ids: Vec<Uuid>,
}

impl From<AssignCoursesRequest> for CourseAssignment {
    fn from(request: AssignCoursesRequest) -> Self {
        CourseAssignment {
            group_ids: request.group_ids,
            student_ids: request.student_ids,
            course_ids: request.course_ids,
        }
    }
}
