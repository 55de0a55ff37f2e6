// ============================================================================
// LMS API - Course Handlers
// File: crates/lms-api/src/handlers/courses.rs
// ============================================================================
//! Course authoring (instructor), review (admin) and the public catalog

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use lms_core::domain::{Caller, Course, InstructorStats, Module};
use lms_core::services::{NewCourse, NewModule};
use uuid::Uuid;

use crate::dto::{CourseListQuery, ReviewCourseRequest};
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// POST /api/courses
pub async fn create_course(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<NewCourse>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Course>>)> {
    let course = state.courses.create_course(&caller, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(course))))
}

/// POST /api/courses/{id}/modules
pub async fn add_module(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(course_id): Path<Uuid>,
    Json(body): Json<NewModule>,
) -> ApiResult<(StatusCode, Json<ApiResponse<Module>>)> {
    let module = state.courses.add_module(&caller, &course_id, body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(module))))
}

/// GET /api/courses/instructor
pub async fn instructor_courses(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    Ok(Json(ApiResponse::success(state.courses.list_instructor_courses(&caller).await?)))
}

/// GET /api/courses/instructor/stats
pub async fn instructor_stats(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
) -> ApiResult<Json<ApiResponse<InstructorStats>>> {
    Ok(Json(ApiResponse::success(state.courses.instructor_stats(&caller).await?)))
}

/// GET /api/courses/explore
pub async fn explore(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    Ok(Json(ApiResponse::success(state.courses.explore().await?)))
}

/// GET /api/admin/courses?status=
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<CourseListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<Course>>>> {
    Ok(Json(ApiResponse::success(state.courses.list_courses(query.status).await?)))
}

/// PATCH /api/admin/courses/{id}/status
pub async fn review_course(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewCourseRequest>,
) -> ApiResult<Json<ApiResponse<Course>>> {
    Ok(Json(ApiResponse::success(state.courses.review_course(&id, body.status).await?)))
}
