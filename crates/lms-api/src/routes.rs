// ============================================================================
// LMS API - Router
// File: crates/lms-api/src/routes.rs
// ============================================================================

use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::handlers::{courses, dashboard, enrollments, groups, health, profile, search, users};
use crate::middleware::{authenticate, require_admin, require_instructor, require_student};
use crate::state::AppState;

/// `*` allows any origin; anything else is taken as a single allowed origin.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
    match origin.parse::<HeaderValue>() {
        Ok(value) if origin != "*" => layer.allow_origin(value),
        _ => layer.allow_origin(Any),
    }
}

pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let admin_routes = Router::new()
        .route("/groups", get(groups::list_groups).post(groups::create_group))
        .route(
            "/groups/{id}",
            get(groups::get_group).put(groups::update_group).delete(groups::delete_group),
        )
        .route("/groups/{id}/users", get(groups::list_members))
        .route(
            "/groups/{id}/users/{user_id}",
            post(groups::add_member).delete(groups::remove_member),
        )
        .route("/users", get(users::list_users))
        .route("/students", get(users::list_students))
        .route("/users/{id}/status", patch(users::update_status))
        .route("/users/{id}/role", patch(users::update_role))
        .route("/instructors", post(users::add_instructor))
        .route("/courses", get(courses::list_courses))
        .route("/courses/{id}/status", patch(courses::review_course))
        .route("/assign-courses", post(enrollments::assign_courses))
        .route("/dashboard-stats", get(dashboard::dashboard_stats))
        .route_layer(middleware::from_fn(require_admin));

    let instructor_routes = Router::new()
        .route("/", post(courses::create_course))
        .route("/instructor", get(courses::instructor_courses))
        .route("/instructor/stats", get(courses::instructor_stats))
        .route("/instructor/search", get(search::search_own_courses))
        .route("/{id}/modules", post(courses::add_module))
        .route_layer(middleware::from_fn(require_instructor));

    let course_routes = Router::new()
        .route("/explore", get(courses::explore))
        .merge(instructor_routes);

    let student_routes = Router::new()
        .route("/search-courses", get(search::search_catalog))
        .route("/my-courses", get(enrollments::my_courses))
        .route("/{course_id}/enroll", post(enrollments::enroll))
        .route_layer(middleware::from_fn(require_student));

    let user_routes = Router::new()
        .route("/me", get(profile::get_me).put(profile::update_me))
        .route("/me/groups", get(profile::my_groups));

    let api_routes = Router::new()
        .nest("/users", user_routes)
        .nest("/admin", admin_routes)
        .nest("/courses", course_routes)
        .nest("/student", student_routes)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes)
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .with_state(state)
}
