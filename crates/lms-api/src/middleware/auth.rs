// ============================================================================
// LMS API - Authentication Middleware
// File: crates/lms-api/src/middleware/auth.rs
// ============================================================================
//! Bearer-token authentication and role guards

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use lms_core::domain::{Caller, UserRole};
use lms_core::DomainError;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Verifies the bearer token, resolves the local account and stores the
/// `Caller` and `User` in the request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state
        .verifier
        .verify(token)
        .map_err(|e| ApiError::Unauthorized(e.to_string()))?;

    let user = state
        .users
        .resolve_caller(&claims.sub, claims.email.as_deref(), claims.name.as_deref())
        .await
        .map_err(|e| match e {
            DomainError::UnknownIdentity => ApiError::Unauthorized(e.to_string()),
            other => ApiError::Domain(other),
        })?;

    let caller = Caller::from(&user);
    debug!("Authenticated {} {}", caller.role.as_str(), caller.user_id);

    request.extensions_mut().insert(caller);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn require_role(request: &Request, allowed: &[UserRole]) -> Result<(), ApiError> {
    let caller = request
        .extensions()
        .get::<Caller>()
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))?;
    caller.require_role(allowed)?;
    Ok(())
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&request, &[UserRole::Admin])?;
    Ok(next.run(request).await)
}

pub async fn require_instructor(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&request, &[UserRole::Instructor])?;
    Ok(next.run(request).await)
}

pub async fn require_student(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(&request, &[UserRole::Student])?;
    Ok(next.run(request).await)
}
