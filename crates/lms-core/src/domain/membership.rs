// ============================================================================
// LMS Core - Membership
// File: crates/lms-core/src/domain/membership.rs
// Description: Stored memberships and the "currently a member" rules
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::group::{Group, GroupKind};
use super::user::User;

/// Inclusive calendar-date window; a missing bound is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// A window with both bounds must start strictly before it ends.
    pub fn is_well_formed(&self) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < end,
            _ => true,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| start <= date) && self.end.map_or(true, |end| date <= end)
    }
}

/// Stored membership of a user in a manual group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    pub fn new(group_id: Uuid, user_id: Uuid, window: DateWindow) -> Self {
        Self {
            group_id,
            user_id,
            start_date: window.start,
            end_date: window.end,
            created_at: Utc::now(),
        }
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }
}

/// The facts about a user that virtual membership depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSubject {
    pub registered_on: NaiveDate,
    pub headline_key: Option<String>,
    pub is_student: bool,
}

impl From<&User> for MemberSubject {
    fn from(user: &User) -> Self {
        Self {
            registered_on: user.registered_on(),
            headline_key: user.headline_key.clone(),
            is_student: user.is_student(),
        }
    }
}

/// Decides whether `subject` is currently in `group` on `today` (UTC).
///
/// `membership` is the stored row for manual groups and is ignored for the
/// virtual kinds.
pub fn is_current_member(
    group: &Group,
    subject: &MemberSubject,
    membership: Option<&Membership>,
    today: NaiveDate,
) -> bool {
    match group.kind() {
        GroupKind::Manual => membership.map_or(false, |m| m.window().contains(today)),
        GroupKind::Timestamp => subject.is_student && group.window().contains(subject.registered_on),
        GroupKind::Institutional => {
            subject.is_student && subject.headline_key.as_deref() == Some(group.name.as_str())
        }
    }
}

/// One row of a group's member listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupMember {
    pub user_id: Uuid,
    pub display_name: String,
    pub email: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Derived from the group rule rather than a stored row.
    #[serde(rename = "virtual")]
    pub is_virtual: bool,
    pub active: bool,
}

impl GroupMember {
    pub fn stored(user: &User, membership: &Membership, today: NaiveDate) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            start_date: membership.start_date,
            end_date: membership.end_date,
            is_virtual: false,
            active: membership.window().contains(today),
        }
    }

    pub fn derived(user: &User) -> Self {
        Self {
            user_id: user.id,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
            start_date: None,
            end_date: None,
            is_virtual: true,
            active: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    fn subject(registered_on: NaiveDate, key: Option<&str>) -> MemberSubject {
        MemberSubject {
            registered_on,
            headline_key: key.map(str::to_string),
            is_student: true,
        }
    }

    #[test]
    fn test_window_contains_is_inclusive() {
        let w = DateWindow::new(Some(date(2024, 1, 1)), Some(date(2024, 1, 31)));
        assert!(w.contains(date(2024, 1, 1)));
        assert!(w.contains(date(2024, 1, 31)));
        assert!(!w.contains(date(2023, 12, 31)));
        assert!(!w.contains(date(2024, 2, 1)));
        assert!(DateWindow::default().contains(date(1999, 1, 1)));
    }

    #[test]
    fn test_timestamp_group_virtual_membership() {
        let g = group(None, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), "JAN 2024");
        let today = date(2025, 6, 1);

        assert!(is_current_member(&g, &subject(date(2024, 1, 15), None), None, today));
        assert!(!is_current_member(&g, &subject(date(2024, 2, 1), None), None, today));
    }

    #[test]
    fn test_virtual_membership_requires_student() {
        let g = group(None, Some(date(2024, 1, 1)), Some(date(2024, 1, 31)), "JAN 2024");
        let mut s = subject(date(2024, 1, 15), None);
        s.is_student = false;
        assert!(!is_current_member(&g, &s, None, date(2024, 6, 1)));
    }

    #[test]
    fn test_institutional_group_matches_headline_key() {
        let g = group(None, None, None, "ABC COLLEGE");
        let today = date(2024, 6, 1);

        assert!(is_current_member(&g, &subject(date(2024, 1, 1), Some("ABC COLLEGE")), None, today));
        assert!(!is_current_member(&g, &subject(date(2024, 1, 1), Some("XYZ COLLEGE")), None, today));
        assert!(!is_current_member(&g, &subject(date(2024, 1, 1), None), None, today));
    }

    #[test]
    fn test_manual_group_uses_membership_window() {
        let g = group(Some(Uuid::new_v4()), None, None, "CURATED");
        let s = subject(date(2024, 1, 1), None);
        let today = date(2024, 6, 15);

        assert!(!is_current_member(&g, &s, None, today));

        let open = Membership::new(g.id, Uuid::new_v4(), DateWindow::default());
        assert!(is_current_member(&g, &s, Some(&open), today));

        let expired = Membership::new(g.id, Uuid::new_v4(), DateWindow::new(None, Some(date(2024, 6, 14))));
        assert!(!is_current_member(&g, &s, Some(&expired), today));

        let future = Membership::new(g.id, Uuid::new_v4(), DateWindow::new(Some(date(2024, 7, 1)), None));
        assert!(!is_current_member(&g, &s, Some(&future), today));
    }

    #[test]
    fn test_manual_group_ignores_its_own_dates() {
        // The group's dates are informational; only the membership's override gates.
        let g = group(Some(Uuid::new_v4()), Some(date(2020, 1, 1)), Some(date(2020, 1, 31)), "OLD");
        let s = subject(date(2024, 1, 1), None);
        let m = Membership::new(g.id, Uuid::new_v4(), DateWindow::default());
        assert!(is_current_member(&g, &s, Some(&m), date(2024, 6, 1)));
    }
}
