//! Keyword search over the catalog and an instructor's own courses

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use lms_core::domain::{Caller, SearchHit, SearchScope};

use crate::dto::SearchParams;
use crate::error::ApiResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/student/search-courses?query=
pub async fn search_catalog(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<ApiResponse<Vec<SearchHit>>>> {
    let hits = state.search.search(SearchScope::Catalog, &params.query).await?;
    Ok(Json(ApiResponse::success(hits)))
}

/// GET /api/courses/instructor/search?query=
pub async fn search_own_courses(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<ApiResponse<Vec<SearchHit>>>> {
    let hits = state
        .search
        .search(SearchScope::Instructor(caller.user_id), &params.query)
        .await?;
    Ok(Json(ApiResponse::success(hits)))
}
