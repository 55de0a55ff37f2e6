//! # LMS API
//! 
//! HTTP handlers, middleware, DTOs, and the router.

pub mod handlers;
pub mod middleware;
pub mod dto;
pub mod error;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
