//! Application services

pub mod group_service;
pub mod user_service;
pub mod course_service;
pub mod search_service;

pub use group_service::GroupService;
pub use user_service::{NewInstructor, UserService};
pub use course_service::{CourseService, NewCourse, NewModule};
pub use search_service::SearchService;
