//! Request and response payloads

pub mod group;
pub mod user;
pub mod course;

pub use group::{AddMemberRequest, CreateGroupRequest, GroupDto, UpdateGroupRequest};
pub use user::{InstructorRequest, UpdateRoleRequest, UpdateStatusRequest, UserDto, UserListQuery};
pub use course::{AssignCoursesRequest, CourseListQuery, ReviewCourseRequest, SearchParams};
