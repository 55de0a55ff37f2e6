//! The caller's own profile and groups

use axum::{extract::State, Extension, Json};
use lms_core::domain::{Caller, Group, ProfileUpdate, User};

use crate::dto::{GroupDto, UserDto};
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_me(Extension(user): Extension<User>) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(user.into()))
}

/// PUT /api/users/me
pub async fn update_me(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<Json<ApiResponse<UserDto>>> {
    let user = state.users.update_profile(&caller, update).await?;
    Ok(Json(ApiResponse::success(user.into())))
}

/// GET /api/users/me/groups
pub async fn my_groups(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> ApiResult<Json<ApiResponse<Vec<GroupDto>>>> {
    let groups: Vec<Group> = state.groups.current_groups(&user).await?;
    Ok(Json(ApiResponse::success(groups.into_iter().map(GroupDto::from).collect())))
}
