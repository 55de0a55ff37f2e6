use chrono::NaiveDate;
use lms_core::domain::{DateWindow, Group, GroupKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default = "default_kind", alias = "type")]
    pub kind: GroupKind,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn default_kind() -> GroupKind {
    GroupKind::Manual
}

#[derive(Debug, Deserialize)]
pub struct UpdateGroupRequest {
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Optional membership date override. An empty body means "no override".
#[derive(Debug, Default, Deserialize)]
pub struct AddMemberRequest {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl AddMemberRequest {
    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }
}

/// A single group with its derived kind.
#[derive(Debug, Serialize)]
pub struct GroupDto {
    #[serde(flatten)]
    pub group: Group,
    pub kind: GroupKind,
}

impl From<Group> for GroupDto {
    fn from(group: Group) -> Self {
        Self {
            kind: group.kind(),
            group,
        }
    }
}
