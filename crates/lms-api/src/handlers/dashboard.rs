use axum::{extract::State, Json};
use lms_core::domain::AdminStats;

use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/admin/dashboard-stats
pub async fn dashboard_stats(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<AdminStats>>> {
    Ok(Json(ApiResponse::success(state.courses.dashboard_stats().await?)))
}
