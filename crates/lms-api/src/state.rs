use std::sync::Arc;

use lms_core::services::{CourseService, GroupService, SearchService, UserService};
use lms_security::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub groups: Arc<GroupService>,
    pub courses: Arc<CourseService>,
    pub search: Arc<SearchService>,
    pub verifier: Arc<TokenVerifier>,
}
