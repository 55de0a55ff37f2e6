//! Self-enrollment and admin bulk assignment

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lms_core::domain::{AssignmentOutcome, Caller, Course, Enrollment};
use uuid::Uuid;

use crate::dto::AssignCoursesRequest;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/student/my-courses
pub async fn my_courses(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    Ok(Json(ApiResponse::success(state.courses.my_courses(&caller).await?)))
}

/// POST /api/student/{course_id}/enroll
pub async fn enroll(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(course_id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Enrollment>>)> {
    let enrollment = state.courses.enroll(&caller, &course_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(enrollment))))
}

/// POST /api/admin/assign-courses
pub async fn assign_courses(
    State(state): State<AppState>,
    Json(body): Json<AssignCoursesRequest>,
) -> ApiResult<Json<ApiResponse<AssignmentOutcome>>> {
    let outcome = state.courses.assign_courses(body.into()).await?;
    Ok(Json(ApiResponse::success(outcome)))
}
