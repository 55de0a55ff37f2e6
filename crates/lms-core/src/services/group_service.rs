// ============================================================================
// LMS Core - Group Service
// File: crates/lms-core/src/services/group_service.rs
// ============================================================================
//! Group administration and membership resolution

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    is_current_member, Caller, DateWindow, Group, GroupDraft, GroupKind, GroupMember, GroupSummary,
    MemberSubject, Membership, User,
};
use crate::error::DomainError;
use crate::repositories::{GroupRepository, UserRepository};

pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    /// Creates a manual, timestamp or institutional group. All checks run
    /// before the insert.
    pub async fn create_group(
        &self,
        caller: &Caller,
        kind: GroupKind,
        name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Group, DomainError> {
        let draft = GroupDraft::new(kind, name, start_date, end_date)?;
        let group = draft.into_group(kind, caller.user_id);

        let created = self.groups.create(&group).await?;
        info!("Group created: {} ({}, {})", created.name, created.id, kind.as_str());
        Ok(created)
    }

    pub async fn list_groups(&self) -> Result<Vec<GroupSummary>, DomainError> {
        let groups = self.groups.list().await?;
        let mut summaries = Vec::with_capacity(groups.len());
        for group in groups {
            let member_count = self.count_members(&group).await?;
            summaries.push(GroupSummary {
                kind: group.kind(),
                group,
                member_count,
            });
        }
        Ok(summaries)
    }

    pub async fn get_group(&self, id: &Uuid) -> Result<Group, DomainError> {
        self.groups
            .find_by_id(id)
            .await?
            .ok_or(DomainError::GroupNotFound(*id))
    }

    pub async fn count_groups(&self) -> Result<i64, DomainError> {
        self.groups.count().await
    }

    /// Renames and re-dates a group. The kind of a group never changes.
    pub async fn update_group(
        &self,
        id: &Uuid,
        name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Group, DomainError> {
        let mut group = self.get_group(id).await?;
        let draft = GroupDraft::new(group.kind(), name, start_date, end_date)?;

        group.name = draft.name;
        group.start_date = draft.start_date;
        group.end_date = draft.end_date;
        group.updated_at = Some(chrono::Utc::now());

        let updated = self.groups.update(&group).await?;
        info!("Group updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_group(&self, id: &Uuid) -> Result<(), DomainError> {
        if !self.groups.delete(id).await? {
            return Err(DomainError::GroupNotFound(*id));
        }
        info!("Group deleted: {}", id);
        Ok(())
    }

    pub async fn list_members(&self, id: &Uuid) -> Result<Vec<GroupMember>, DomainError> {
        self.list_members_on(id, lms_shared::today_utc()).await
    }

    pub async fn list_members_on(&self, id: &Uuid, today: NaiveDate) -> Result<Vec<GroupMember>, DomainError> {
        let group = self.get_group(id).await?;
        let members = match group.kind() {
            GroupKind::Manual => self
                .groups
                .list_memberships(&group.id)
                .await?
                .iter()
                .map(|(user, membership)| GroupMember::stored(user, membership, today))
                .collect(),
            GroupKind::Timestamp | GroupKind::Institutional => self
                .virtual_members(&group)
                .await?
                .iter()
                .map(GroupMember::derived)
                .collect(),
        };
        Ok(members)
    }

    pub async fn add_member(
        &self,
        group_id: &Uuid,
        user_id: &Uuid,
        window: DateWindow,
    ) -> Result<Membership, DomainError> {
        let group = self.get_group(group_id).await?;
        Self::require_manual(&group)?;

        if !window.is_well_formed() {
            return Err(DomainError::validation("Start date must be before end date"));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(*user_id))?;
        if !user.is_student() {
            return Err(DomainError::validation("Only students can be added to a group"));
        }

        let membership = self
            .groups
            .add_membership(&Membership::new(group.id, user.id, window))
            .await?;
        info!("User {} added to group {}", user.id, group.id);
        Ok(membership)
    }

    pub async fn remove_member(&self, group_id: &Uuid, user_id: &Uuid) -> Result<(), DomainError> {
        let group = self.get_group(group_id).await?;
        Self::require_manual(&group)?;

        if !self.groups.remove_membership(group_id, user_id).await? {
            return Err(DomainError::MembershipNotFound {
                group_id: *group_id,
                user_id: *user_id,
            });
        }
        info!("User {} removed from group {}", user_id, group_id);
        Ok(())
    }

    /// Groups `user` belongs to right now.
    pub async fn current_groups(&self, user: &User) -> Result<Vec<Group>, DomainError> {
        self.current_groups_on(user, lms_shared::today_utc()).await
    }

    pub async fn current_groups_on(&self, user: &User, today: NaiveDate) -> Result<Vec<Group>, DomainError> {
        let subject = MemberSubject::from(user);
        let memberships: HashMap<Uuid, Membership> = self
            .groups
            .memberships_for_user(&user.id)
            .await?
            .into_iter()
            .map(|m| (m.group_id, m))
            .collect();

        Ok(self
            .groups
            .list()
            .await?
            .into_iter()
            .filter(|group| is_current_member(group, &subject, memberships.get(&group.id), today))
            .collect())
    }

    /// Ids of every student currently in the group, stored or derived.
    /// Stored members whose role has since changed are skipped.
    pub async fn current_member_ids(&self, group: &Group, today: NaiveDate) -> Result<Vec<Uuid>, DomainError> {
        match group.kind() {
            GroupKind::Manual => Ok(self
                .groups
                .list_memberships(&group.id)
                .await?
                .into_iter()
                .filter(|(user, membership)| user.is_student() && membership.window().contains(today))
                .map(|(user, _)| user.id)
                .collect()),
            GroupKind::Timestamp | GroupKind::Institutional => {
                Ok(self.virtual_members(group).await?.into_iter().map(|u| u.id).collect())
            }
        }
    }

    fn require_manual(group: &Group) -> Result<(), DomainError> {
        let kind = group.kind();
        if kind.is_virtual() {
            warn!("Rejected explicit membership change on {} group {}", kind.as_str(), group.id);
            return Err(DomainError::validation(format!(
                "Members of a {} group are derived and cannot be added or removed",
                kind.as_str()
            )));
        }
        Ok(())
    }

    async fn virtual_members(&self, group: &Group) -> Result<Vec<User>, DomainError> {
        match (group.kind(), group.start_date, group.end_date) {
            (GroupKind::Timestamp, Some(start), Some(end)) => {
                self.users.list_students_registered_between(start, end).await
            }
            (GroupKind::Institutional, _, _) => self.users.list_students_by_headline_key(&group.name).await,
            _ => Ok(Vec::new()),
        }
    }

    async fn count_members(&self, group: &Group) -> Result<i64, DomainError> {
        match (group.kind(), group.start_date, group.end_date) {
            (GroupKind::Manual, _, _) => self.groups.count_memberships(&group.id).await,
            (GroupKind::Timestamp, Some(start), Some(end)) => {
                self.users.count_students_registered_between(start, end).await
            }
            (GroupKind::Institutional, _, _) => self.users.count_students_by_headline_key(&group.name).await,
            _ => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserRole, UserStatus};
    use crate::repositories::{MockGroupRepository, MockUserRepository};
    use chrono::{TimeZone, Utc};
    use mockall::predicate::eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn group(created_by: Option<Uuid>, start: Option<NaiveDate>, end: Option<NaiveDate>, name: &str) -> Group {
        Group {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_by,
            start_date: start,
            end_date: end,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    fn user(role: UserRole, registered: NaiveDate, headline_key: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            external_uid: None,
            display_name: "Student".to_string(),
            email: "student@example.com".to_string(),
            role,
            status: UserStatus::Active,
            bio: None,
            headline: headline_key.map(str::to_string),
            headline_key: headline_key.map(str::to_string),
            linkedin: None,
            github: None,
            photo_url: None,
            created_at: Utc
                .from_utc_datetime(&registered.and_hms_opt(12, 0, 0).unwrap()),
            updated_at: None,
        }
    }

    fn service(groups: MockGroupRepository, users: MockUserRepository) -> GroupService {
        GroupService::new(Arc::new(groups), Arc::new(users))
    }

    fn admin() -> Caller {
        Caller::new(Uuid::new_v4(), UserRole::Admin)
    }

    #[tokio::test]
    async fn test_create_manual_group_with_inverted_dates_never_writes() {
        let mut groups = MockGroupRepository::new();
        groups.expect_create().never();

        let svc = service(groups, MockUserRepository::new());
        let result = svc
            .create_group(&admin(), GroupKind::Manual, "Batch A", Some(date(2024, 5, 1)), Some(date(2024, 4, 1)))
            .await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_manual_group_records_creator_and_normalized_name() {
        let caller = admin();
        let mut groups = MockGroupRepository::new();
        groups
            .expect_create()
            .withf(move |g: &Group| g.name == "BATCH A" && g.created_by == Some(caller.user_id))
            .times(1)
            .returning(|g| Ok(g.clone()));

        let svc = service(groups, MockUserRepository::new());
        let created = svc
            .create_group(&caller, GroupKind::Manual, "batch-a", None, None)
            .await
            .unwrap();
        assert_eq!(created.kind(), GroupKind::Manual);
    }

    #[tokio::test]
    async fn test_create_group_surfaces_name_conflict() {
        let mut groups = MockGroupRepository::new();
        groups
            .expect_create()
            .returning(|g| Err(DomainError::GroupNameAlreadyExists(g.name.clone())));

        let svc = service(groups, MockUserRepository::new());
        let err = svc
            .create_group(&admin(), GroupKind::Timestamp, "Jan", Some(date(2024, 1, 1)), Some(date(2024, 1, 31)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::GroupNameAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_add_member_rejected_for_timestamp_group() {
        let g = group(None, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), "JAN");
        let gid = g.id;
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().with(eq(gid)).returning(move |_| Ok(Some(g.clone())));
        groups.expect_add_membership().never();

        let svc = service(groups, MockUserRepository::new());
        let err = svc.add_member(&gid, &Uuid::new_v4(), DateWindow::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_remove_member_rejected_for_institutional_group() {
        let g = group(None, None, None, "ABC COLLEGE");
        let gid = g.id;
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(g.clone())));
        groups.expect_remove_membership().never();

        let svc = service(groups, MockUserRepository::new());
        let err = svc.remove_member(&gid, &Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_add_member_to_manual_group() {
        let g = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let gid = g.id;
        let student = user(UserRole::Student, date(2024, 1, 1), None);
        let sid = student.id;

        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(g.clone())));
        groups
            .expect_add_membership()
            .withf(move |m: &Membership| m.user_id == sid && m.end_date == Some(date(2024, 12, 31)))
            .times(1)
            .returning(|m| Ok(m.clone()));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().with(eq(sid)).returning(move |_| Ok(Some(student.clone())));

        let svc = service(groups, users);
        let m = svc
            .add_member(&gid, &sid, DateWindow::new(Some(date(2024, 1, 1)), Some(date(2024, 12, 31))))
            .await
            .unwrap();
        assert_eq!(m.group_id, gid);
    }

    #[tokio::test]
    async fn test_add_member_rejects_non_student() {
        let g = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let gid = g.id;
        let instructor = user(UserRole::Instructor, date(2024, 1, 1), None);
        let iid = instructor.id;

        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(g.clone())));
        groups.expect_add_membership().never();
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(move |_| Ok(Some(instructor.clone())));

        let svc = service(groups, users);
        let err = svc.add_member(&gid, &iid, DateWindow::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_add_member_unknown_user_is_not_found() {
        let g = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let gid = g.id;
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(g.clone())));
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let svc = service(groups, users);
        let err = svc.add_member(&gid, &Uuid::new_v4(), DateWindow::default()).await.unwrap_err();
        assert!(matches!(err, DomainError::UserNotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_membership_is_not_found() {
        let g = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let gid = g.id;
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(g.clone())));
        groups.expect_remove_membership().returning(|_, _| Ok(false));

        let svc = service(groups, MockUserRepository::new());
        let err = svc.remove_member(&gid, &Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::MembershipNotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_members_of_timestamp_group_is_virtual() {
        let g = group(None, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), "JAN");
        let gid = g.id;
        let student = user(UserRole::Student, date(2024, 1, 15), None);

        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(g.clone())));
        groups.expect_list_memberships().never();
        let mut users = MockUserRepository::new();
        users
            .expect_list_students_registered_between()
            .with(eq(date(2024, 1, 1)), eq(date(2024, 1, 31)))
            .returning(move |_, _| Ok(vec![student.clone()]));

        let svc = service(groups, users);
        let members = svc.list_members_on(&gid, date(2024, 6, 1)).await.unwrap();
        assert_eq!(members.len(), 1);
        assert!(members[0].is_virtual);
        assert!(members[0].active);
    }

    #[tokio::test]
    async fn test_list_members_of_manual_group_flags_expired_rows() {
        let g = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let gid = g.id;
        let current = user(UserRole::Student, date(2024, 1, 1), None);
        let expired = user(UserRole::Student, date(2024, 1, 1), None);
        let rows = vec![
            (current.clone(), Membership::new(gid, current.id, DateWindow::default())),
            (
                expired.clone(),
                Membership::new(gid, expired.id, DateWindow::new(None, Some(date(2024, 3, 1)))),
            ),
        ];

        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(g.clone())));
        groups.expect_list_memberships().returning(move |_| Ok(rows.clone()));

        let svc = service(groups, MockUserRepository::new());
        let members = svc.list_members_on(&gid, date(2024, 6, 1)).await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[0].active);
        assert!(!members[1].active);
        assert!(members.iter().all(|m| !m.is_virtual));
    }

    #[tokio::test]
    async fn test_list_groups_counts_by_kind() {
        let manual = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let window = group(None, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), "JAN");
        let college = group(None, None, None, "ABC COLLEGE");
        let all = vec![manual.clone(), window.clone(), college.clone()];

        let mut groups = MockGroupRepository::new();
        groups.expect_list().returning(move || Ok(all.clone()));
        groups.expect_count_memberships().with(eq(manual.id)).returning(|_| Ok(3));
        let mut users = MockUserRepository::new();
        users.expect_count_students_registered_between().returning(|_, _| Ok(7));
        users
            .expect_count_students_by_headline_key()
            .withf(|key: &str| key == "ABC COLLEGE")
            .returning(|_| Ok(11));

        let svc = service(groups, users);
        let summaries = svc.list_groups().await.unwrap();
        let counts: Vec<(GroupKind, i64)> = summaries.iter().map(|s| (s.kind, s.member_count)).collect();
        assert_eq!(
            counts,
            vec![(GroupKind::Manual, 3), (GroupKind::Timestamp, 7), (GroupKind::Institutional, 11)]
        );
    }

    #[tokio::test]
    async fn test_current_groups_combines_all_kinds() {
        let manual = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let other_manual = group(Some(Uuid::new_v4()), None, None, "OTHER");
        let window = group(None, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), "JAN");
        let late_window = group(None, Some(date(2024, 2, 1)), Some(date(2024, 2, 28)), "FEB");
        let college = group(None, None, None, "ABC COLLEGE");
        let all = vec![
            manual.clone(),
            other_manual.clone(),
            window.clone(),
            late_window.clone(),
            college.clone(),
        ];

        let student = user(UserRole::Student, date(2024, 1, 15), Some("ABC COLLEGE"));
        let membership = Membership::new(manual.id, student.id, DateWindow::default());

        let mut groups = MockGroupRepository::new();
        groups.expect_list().returning(move || Ok(all.clone()));
        groups
            .expect_memberships_for_user()
            .returning(move |_| Ok(vec![membership.clone()]));

        let svc = service(groups, MockUserRepository::new());
        let mine: Vec<String> = svc
            .current_groups_on(&student, date(2024, 6, 1))
            .await
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(mine, vec!["CURATED", "JAN", "ABC COLLEGE"]);
    }

    #[tokio::test]
    async fn test_update_group_keeps_kind_rules() {
        let g = group(None, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), "JAN");
        let gid = g.id;
        let mut groups = MockGroupRepository::new();
        groups.expect_find_by_id().returning(move |_| Ok(Some(g.clone())));
        groups.expect_update().never();

        let svc = service(groups, MockUserRepository::new());
        // A timestamp group cannot drop its dates.
        let err = svc.update_group(&gid, "Jan", None, None).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_current_member_ids_skips_members_no_longer_students() {
        let g = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let gid = g.id;
        let student = user(UserRole::Student, date(2024, 1, 1), None);
        let promoted = user(UserRole::Instructor, date(2024, 1, 1), None);
        let rows = vec![
            (student.clone(), Membership::new(gid, student.id, DateWindow::default())),
            (promoted.clone(), Membership::new(gid, promoted.id, DateWindow::default())),
        ];

        let mut groups = MockGroupRepository::new();
        groups.expect_list_memberships().returning(move |_| Ok(rows.clone()));

        let svc = service(groups, MockUserRepository::new());
        let ids = svc.current_member_ids(&g, date(2024, 6, 1)).await.unwrap();
        assert_eq!(ids, vec![student.id]);
    }

    #[tokio::test]
    async fn test_delete_missing_group_is_not_found() {
        let mut groups = MockGroupRepository::new();
        groups.expect_delete().returning(|_| Ok(false));

        let svc = service(groups, MockUserRepository::new());
        let err = svc.delete_group(&Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::GroupNotFound(_)));
    }
}
