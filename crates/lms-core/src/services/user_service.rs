// ============================================================================
// LMS Core - User Service
// File: crates/lms-core/src/services/user_service.rs
// ============================================================================
//! Profiles, admin user management, and instructor onboarding

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use lms_shared::utils::{mask_email, non_blank};

use crate::domain::{
    Caller, Group, InstructorProfile, ProfileUpdate, User, UserFilter, UserRole, UserStatus,
};
use crate::error::DomainError;
use crate::ports::{IdentityProvider, Notifier};
use crate::repositories::{GroupRepository, UserRepository};

/// Admin input for onboarding an instructor.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewInstructor {
    #[validate(length(min = 1, max = 120, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, max = 120, message = "Subject is required"))]
    pub subject: String,
    pub phone: Option<String>,
    pub bio: Option<String>,
}

pub struct UserService {
    users: Arc<dyn UserRepository>,
    groups: Arc<dyn GroupRepository>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        groups: Arc<dyn GroupRepository>,
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            users,
            groups,
            identity,
            notifier,
        }
    }

    /// Maps a verified identity-provider subject to a local account,
    /// registering a student on first sight.
    pub async fn resolve_caller(
        &self,
        subject: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<User, DomainError> {
        let user = match self.users.find_by_external_uid(subject).await? {
            Some(user) => user,
            None => self.register_student(subject, email, name).await?,
        };

        if !user.is_active() {
            warn!("Rejected request from {} user {}", user.status.as_str(), user.id);
            return Err(DomainError::UserNotActive);
        }
        Ok(user)
    }

    async fn register_student(
        &self,
        subject: &str,
        email: Option<&str>,
        name: Option<&str>,
    ) -> Result<User, DomainError> {
        let email = email.ok_or(DomainError::UnknownIdentity)?;
        let display_name = non_blank(name)
            .unwrap_or_else(|| email.split('@').next().unwrap_or(email).to_string());

        let user = User::new(
            Some(subject.to_string()),
            display_name,
            email.to_string(),
            UserRole::Student,
        )?;

        let created = match self.users.create(&user).await {
            Ok(created) => created,
            // A concurrent first request may have registered the same subject.
            Err(DomainError::EmailAlreadyExists(_)) => self
                .users
                .find_by_external_uid(subject)
                .await?
                .ok_or_else(|| DomainError::EmailAlreadyExists(user.email.clone()))?,
            Err(e) => return Err(e),
        };
        info!("Registered student {} ({})", created.id, mask_email(&created.email));

        if let Err(e) = self.notifier.send_welcome(&created).await {
            error!("Welcome mail to {} failed: {}", mask_email(&created.email), e);
        }
        Ok(created)
    }

    pub async fn get_profile(&self, user_id: &Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(*user_id))
    }

    /// Replaces the caller's profile fields. A student whose headline changes
    /// gets the matching institutional group created if it is missing.
    pub async fn update_profile(&self, caller: &Caller, update: ProfileUpdate) -> Result<User, DomainError> {
        let mut user = self.get_profile(&caller.user_id).await?;
        let previous_headline = user.headline.clone();

        if let Some(name) = non_blank(update.display_name.as_deref()) {
            user.display_name = name;
        }
        user.bio = update.bio;
        user.linkedin = update.linkedin;
        user.github = update.github;
        user.photo_url = update.photo_url;
        user.set_headline(non_blank(update.headline.as_deref()));
        user.updated_at = Some(Utc::now());
        user.validate()?;

        let updated = self.users.update_profile(&user).await?;
        info!("Profile updated for user {}", updated.id);

        let headline_changed = updated.headline.is_some() && updated.headline != previous_headline;
        if headline_changed && caller.role == UserRole::Student {
            if let Some(key) = updated.headline_key.clone() {
                let created = self.groups.insert_if_absent(&Group::institutional(key.clone())).await?;
                if created {
                    info!("Institutional group created: {}", key);
                }
            }
        }

        Ok(updated)
    }

    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<User>, DomainError> {
        self.users.list(filter).await
    }

    /// Active students, for group and course assignment pickers.
    pub async fn list_students(&self) -> Result<Vec<User>, DomainError> {
        let filter = UserFilter {
            email: None,
            role: Some(UserRole::Student),
        };
        Ok(self
            .users
            .list(&filter)
            .await?
            .into_iter()
            .filter(User::is_active)
            .collect())
    }

    pub async fn update_status(&self, user_id: &Uuid, status: UserStatus) -> Result<User, DomainError> {
        let user = self
            .users
            .update_status(user_id, status)
            .await?
            .ok_or(DomainError::UserNotFound(*user_id))?;
        info!("User {} status set to {}", user.id, status.as_str());
        Ok(user)
    }

    pub async fn update_role(&self, user_id: &Uuid, role: UserRole) -> Result<User, DomainError> {
        let user = self
            .users
            .update_role(user_id, role)
            .await?
            .ok_or(DomainError::UserNotFound(*user_id))?;
        info!("User {} role set to {}", user.id, role.as_str());
        Ok(user)
    }

    /// Creates the sign-in account and local records, then sends the
    /// invite. The invite is best effort.
    pub async fn add_instructor(&self, input: NewInstructor) -> Result<User, DomainError> {
        input.validate()?;
        let email = input.email.trim().to_lowercase();

        if self.users.find_by_email(&email).await?.is_some() {
            warn!("Instructor onboarding rejected, email exists: {}", mask_email(&email));
            return Err(DomainError::EmailAlreadyExists(email));
        }

        let external_uid = self.identity.create_account(&email, input.full_name.trim()).await?;

        let mut user = User::new(Some(external_uid), input.full_name, email, UserRole::Instructor)?;
        user.bio = non_blank(input.bio.as_deref());
        let profile = InstructorProfile {
            instructor_id: user.id,
            subject: input.subject.trim().to_string(),
            phone: non_blank(input.phone.as_deref()),
            bio: user.bio.clone(),
        };

        let created = self.users.create_instructor(&user, &profile).await?;
        info!("Instructor created: {} ({})", created.id, mask_email(&created.email));

        if let Err(e) = self.notifier.send_instructor_invite(&created).await {
            error!("Instructor invite to {} failed: {}", mask_email(&created.email), e);
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MockIdentityProvider, MockNotifier};
    use crate::repositories::{MockGroupRepository, MockUserRepository};
    use mockall::predicate::eq;

    struct Mocks {
        users: MockUserRepository,
        groups: MockGroupRepository,
        identity: MockIdentityProvider,
        notifier: MockNotifier,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                users: MockUserRepository::new(),
                groups: MockGroupRepository::new(),
                identity: MockIdentityProvider::new(),
                notifier: MockNotifier::new(),
            }
        }

        fn build(self) -> UserService {
            UserService::new(
                Arc::new(self.users),
                Arc::new(self.groups),
                Arc::new(self.identity),
                Arc::new(self.notifier),
            )
        }
    }

    fn student(headline: Option<&str>) -> User {
        let mut user = User::new(
            Some("uid-1".to_string()),
            "Ada".to_string(),
            "ada@example.com".to_string(),
            UserRole::Student,
        )
        .unwrap();
        user.set_headline(headline.map(str::to_string));
        user
    }

    fn headline_update(headline: &str) -> ProfileUpdate {
        ProfileUpdate {
            headline: Some(headline.to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_profile_update_creates_institutional_group_for_student() {
        let user = student(None);
        let caller = Caller::from(&user);
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        mocks.users.expect_update_profile().returning(|u| Ok(u.clone()));
        mocks
            .groups
            .expect_insert_if_absent()
            .withf(|g: &Group| g.name == "ABC COLLEGE" && g.created_by.is_none() && g.start_date.is_none())
            .times(1)
            .returning(|_| Ok(true));

        let updated = mocks
            .build()
            .update_profile(&caller, headline_update("  abc college,  "))
            .await
            .unwrap();
        assert_eq!(updated.headline.as_deref(), Some("abc college,"));
        assert_eq!(updated.headline_key.as_deref(), Some("ABC COLLEGE"));
    }

    #[tokio::test]
    async fn test_existing_institutional_group_is_not_an_error() {
        let user = student(Some("XYZ"));
        let caller = Caller::from(&user);
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        mocks.users.expect_update_profile().returning(|u| Ok(u.clone()));
        mocks.groups.expect_insert_if_absent().times(1).returning(|_| Ok(false));

        let result = mocks.build().update_profile(&caller, headline_update("ABC. College")).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_overlong_headline_is_rejected_before_any_write() {
        let user = student(None);
        let caller = Caller::from(&user);
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        mocks.users.expect_update_profile().never();
        mocks.groups.expect_insert_if_absent().never();

        let headline = "Institute of Advanced Studies ".repeat(5);
        let err = mocks
            .build()
            .update_profile(&caller, headline_update(&headline))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_unchanged_headline_skips_group() {
        let user = student(Some("ABC College"));
        let caller = Caller::from(&user);
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        mocks.users.expect_update_profile().returning(|u| Ok(u.clone()));
        mocks.groups.expect_insert_if_absent().never();

        mocks
            .build()
            .update_profile(&caller, headline_update("ABC College"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_instructor_headline_skips_group() {
        let mut user = student(None);
        user.role = UserRole::Instructor;
        let caller = Caller::from(&user);
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        mocks.users.expect_update_profile().returning(|u| Ok(u.clone()));
        mocks.groups.expect_insert_if_absent().never();

        mocks
            .build()
            .update_profile(&caller, headline_update("ABC College"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_blank_display_name_keeps_current_and_blank_headline_clears() {
        let user = student(Some("ABC College"));
        let caller = Caller::from(&user);
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_id().returning(move |_| Ok(Some(user.clone())));
        mocks.users.expect_update_profile().returning(|u| Ok(u.clone()));
        mocks.groups.expect_insert_if_absent().never();

        let updated = mocks
            .build()
            .update_profile(
                &caller,
                ProfileUpdate {
                    display_name: Some("   ".to_string()),
                    headline: Some("  ".to_string()),
                    bio: Some("Hello".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.display_name, "Ada");
        assert_eq!(updated.headline, None);
        assert_eq!(updated.headline_key, None);
        assert_eq!(updated.bio.as_deref(), Some("Hello"));
    }

    #[tokio::test]
    async fn test_resolve_caller_registers_unknown_subject() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_external_uid().returning(|_| Ok(None));
        mocks
            .users
            .expect_create()
            .withf(|u: &User| u.role == UserRole::Student && u.external_uid.as_deref() == Some("sub-9"))
            .returning(|u| Ok(u.clone()));
        mocks
            .notifier
            .expect_send_welcome()
            .times(1)
            .returning(|_| Err(DomainError::InternalError("smtp down".into())));

        let user = mocks
            .build()
            .resolve_caller("sub-9", Some("new@example.com"), None)
            .await
            .unwrap();
        assert_eq!(user.display_name, "new");
        assert!(user.is_student());
    }

    #[tokio::test]
    async fn test_resolve_caller_without_email_is_unknown() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_external_uid().returning(|_| Ok(None));
        mocks.users.expect_create().never();

        let err = mocks.build().resolve_caller("sub-9", None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::UnknownIdentity));
    }

    #[tokio::test]
    async fn test_resolve_caller_rejects_suspended_user() {
        let mut user = student(None);
        user.status = UserStatus::Suspended;
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_external_uid().returning(move |_| Ok(Some(user.clone())));

        let err = mocks.build().resolve_caller("uid-1", None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotActive));
    }

    fn new_instructor() -> NewInstructor {
        NewInstructor {
            full_name: "Grace Hopper".to_string(),
            email: "Grace@Example.com".to_string(),
            subject: "Compilers".to_string(),
            phone: Some("  ".to_string()),
            bio: None,
        }
    }

    #[tokio::test]
    async fn test_add_instructor_duplicate_email_skips_identity_provider() {
        let existing = student(None);
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_find_by_email()
            .withf(|email: &str| email == "grace@example.com")
            .returning(move |_| Ok(Some(existing.clone())));
        mocks.identity.expect_create_account().never();

        let err = mocks.build().add_instructor(new_instructor()).await.unwrap_err();
        assert!(matches!(err, DomainError::EmailAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_add_instructor_succeeds_when_invite_fails() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));
        mocks
            .identity
            .expect_create_account()
            .times(1)
            .returning(|_, _| Ok("idp-42".to_string()));
        mocks
            .users
            .expect_create_instructor()
            .withf(|u: &User, p: &InstructorProfile| {
                u.role == UserRole::Instructor && p.instructor_id == u.id && p.phone.is_none()
            })
            .returning(|u, _| Ok(u.clone()));
        mocks
            .notifier
            .expect_send_instructor_invite()
            .times(1)
            .returning(|_| Err(DomainError::InternalError("smtp down".into())));

        let user = mocks.build().add_instructor(new_instructor()).await.unwrap();
        assert_eq!(user.external_uid.as_deref(), Some("idp-42"));
        assert_eq!(user.email, "grace@example.com");
    }

    #[tokio::test]
    async fn test_add_instructor_identity_outage_is_upstream_failure() {
        let mut mocks = Mocks::new();
        mocks.users.expect_find_by_email().returning(|_| Ok(None));
        mocks
            .identity
            .expect_create_account()
            .returning(|_, _| Err(DomainError::IdentityProviderError("503".into())));
        mocks.users.expect_create_instructor().never();

        let err = mocks.build().add_instructor(new_instructor()).await.unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::UpstreamFailure);
    }

    #[tokio::test]
    async fn test_update_status_of_missing_user() {
        let id = Uuid::new_v4();
        let mut mocks = Mocks::new();
        mocks
            .users
            .expect_update_status()
            .with(eq(id), eq(UserStatus::Inactive))
            .returning(|_, _| Ok(None));

        let err = mocks.build().update_status(&id, UserStatus::Inactive).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }
}
