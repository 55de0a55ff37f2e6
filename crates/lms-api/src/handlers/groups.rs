// ============================================================================
// LMS API - Group Handlers
// File: crates/lms-api/src/handlers/groups.rs
// ============================================================================
//! Admin group CRUD and membership management

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use lms_core::domain::{Caller, GroupMember, GroupSummary, Membership};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::dto::{AddMemberRequest, CreateGroupRequest, GroupDto, UpdateGroupRequest};
use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/admin/groups
pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<Vec<GroupSummary>>>> {
    Ok(Json(ApiResponse::success(state.groups.list_groups().await?)))
}

/// POST /api/admin/groups
pub async fn create_group(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<CreateGroupRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<GroupDto>>)> {
    let group = state
        .groups
        .create_group(&caller, body.kind, &body.name, body.start_date, body.end_date)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(group.into()))))
}

/// GET /api/admin/groups/{id}
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<GroupDto>>> {
    let group = state.groups.get_group(&id).await?;
    Ok(Json(ApiResponse::success(group.into())))
}

/// PUT /api/admin/groups/{id}
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateGroupRequest>,
) -> ApiResult<Json<ApiResponse<GroupDto>>> {
    let group = state
        .groups
        .update_group(&id, &body.name, body.start_date, body.end_date)
        .await?;
    Ok(Json(ApiResponse::success(group.into())))
}

/// DELETE /api/admin/groups/{id}
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    state.groups.delete_group(&id).await?;
    Ok(Json(ApiResponse::success(json!({ "id": id }))))
}

/// GET /api/admin/groups/{id}/users
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ApiResponse<Vec<GroupMember>>>> {
    Ok(Json(ApiResponse::success(state.groups.list_members(&id).await?)))
}

/// POST /api/admin/groups/{id}/users/{user_id}
pub async fn add_member(
    State(state): State<AppState>,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<ApiResponse<Membership>>)> {
    // The date override is optional, so an empty body is accepted.
    let request: AddMemberRequest = if body.iter().all(u8::is_ascii_whitespace) {
        AddMemberRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };
    let window = request.window();
    let membership = state.groups.add_member(&group_id, &user_id, window).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(membership))))
}

/// DELETE /api/admin/groups/{id}/users/{user_id}
pub async fn remove_member(
    State(state): State<AppState>,
    Path((group_id, user_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ApiResponse<Value>>> {
    state.groups.remove_member(&group_id, &user_id).await?;
    Ok(Json(ApiResponse::success(json!({ "group_id": group_id, "user_id": user_id }))))
}
