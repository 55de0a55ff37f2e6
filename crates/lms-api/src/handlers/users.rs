// ============================================================================
// LMS API - Admin User Handlers
// File: crates/lms-api/src/handlers/users.rs
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lms_core::domain::UserFilter;
use uuid::Uuid;

use crate::dto::{InstructorRequest, UpdateRoleRequest, UpdateStatusRequest, UserDto, UserListQuery};
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

fn to_dtos(users: Vec<lms_core::domain::User>) -> Vec<UserDto> {
    users.into_iter().map(UserDto::from).collect()
}

/// GET /api/admin/users?email=&role=
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> ApiResult<Json<ApiResponse<Vec<UserDto>>>> {
    let filter = UserFilter {
        email: lms_shared::utils::non_blank(query.email.as_deref()),
        role: query.role,
    };
    let users = state.users.list_users(&filter).await?;
    Ok(Json(ApiResponse::success(to_dtos(users))))
}

/// GET /api/admin/students
pub async fn list_students(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<UserDto>>>> {
    let users = state.users.list_students().await?;
    Ok(Json(ApiResponse::success(to_dtos(users))))
}

/// PATCH /api/admin/users/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state.users.update_status(&id, body.status).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// PATCH /api/admin/users/{id}/role
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state.users.update_role(&id, body.role).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// POST /api/admin/instructors
pub async fn add_instructor(
    State(state): State<AppState>,
    Json(body): Json<InstructorRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<UserDto>>)> {
    let user = state.users.add_instructor(body).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}
