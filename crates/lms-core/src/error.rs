//! Domain errors

use thiserror::Error;
use uuid::Uuid;

/// Coarse error classes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Forbidden,
    UpstreamFailure,
}

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("No account is registered for this identity")]
    UnknownIdentity,

    #[error("User not active")]
    UserNotActive,

    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),

    #[error("Course not found: {0}")]
    CourseNotFound(Uuid),

    #[error("User {user_id} is not a member of group {group_id}")]
    MembershipNotFound { group_id: Uuid, user_id: Uuid },

    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Group name already exists: {0}")]
    GroupNameAlreadyExists(String),

    #[error("User {user_id} is already a member of group {group_id}")]
    AlreadyMember { group_id: Uuid, user_id: Uuid },

    #[error("Student {student_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { student_id: Uuid, course_id: Uuid },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Identity provider error: {0}")]
    IdentityProviderError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::ValidationError(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::UnknownIdentity
            | DomainError::GroupNotFound(_)
            | DomainError::CourseNotFound(_)
            | DomainError::MembershipNotFound { .. } => ErrorKind::NotFound,
            DomainError::EmailAlreadyExists(_)
            | DomainError::GroupNameAlreadyExists(_)
            | DomainError::AlreadyMember { .. }
            | DomainError::AlreadyEnrolled { .. } => ErrorKind::Conflict,
            DomainError::ValidationError(_) => ErrorKind::Validation,
            DomainError::UserNotActive | DomainError::Forbidden(_) => ErrorKind::Forbidden,
            DomainError::IdentityProviderError(_)
            | DomainError::DatabaseError(_)
            | DomainError::InternalError(_) => ErrorKind::UpstreamFailure,
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();
        messages.sort();
        DomainError::ValidationError(messages.join("; "))
    }
}
