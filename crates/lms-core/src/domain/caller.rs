//! The authenticated user a request acts for

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{User, UserRole};
use crate::error::DomainError;

/// Identity of an already-verified caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl Caller {
    pub fn new(user_id: Uuid, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn require_role(&self, allowed: &[UserRole]) -> Result<(), DomainError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(DomainError::Forbidden(format!(
                "role '{}' may not perform this action",
                self.role.as_str()
            )))
        }
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role() {
        let caller = Caller::new(Uuid::new_v4(), UserRole::Student);
        assert!(caller.require_role(&[UserRole::Student, UserRole::Admin]).is_ok());
        assert!(matches!(
            caller.require_role(&[UserRole::Admin]),
            Err(DomainError::Forbidden(_))
        ));
    }
}
