//! # LMS Core - Domain Module
//! 
//! Domain entities and the pure rules around them.

pub mod user;
pub mod group;
pub mod group_name;
pub mod membership;
pub mod course;
pub mod enrollment;
pub mod search;
pub mod caller;
pub mod stats;

// Re-export all entities and enums
pub use user::{User, UserRole, UserStatus, ProfileUpdate, UserFilter, InstructorProfile};
pub use group::{Group, GroupKind, GroupDraft, GroupSummary};
pub use group_name::normalize_group_name;
pub use membership::{DateWindow, Membership, MemberSubject, GroupMember, is_current_member};
pub use course::{Course, CourseStatus, Module, ValidityUnit};
pub use enrollment::{Enrollment, EnrollmentSource, CourseAssignment, AssignmentOutcome};
pub use search::{SearchQuery, SearchScope, SearchHit, SearchHitKind, merge_hits};
pub use caller::Caller;
pub use stats::{AdminStats, InstructorStats};
