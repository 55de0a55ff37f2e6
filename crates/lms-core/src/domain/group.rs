// ============================================================================
// LMS Core - Group Entity
// File: crates/lms-core/src/domain/group.rs
// Description: Student groups and their classification
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::group_name::normalize_group_name;
use super::membership::DateWindow;
use crate::error::DomainError;

/// How a group gets its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupKind {
    /// Curated by an admin; memberships are stored rows.
    Manual,
    /// Students registered inside the group's date window.
    Timestamp,
    /// Students whose normalized headline equals the group name.
    Institutional,
}

impl GroupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKind::Manual => "manual",
            GroupKind::Timestamp => "timestamp",
            GroupKind::Institutional => "institutional",
        }
    }

    /// Whether membership is derived on read instead of stored.
    pub fn is_virtual(&self) -> bool {
        !matches!(self, GroupKind::Manual)
    }

    /// Classifies a group from its nullable attributes.
    pub fn classify(
        created_by: Option<Uuid>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        if created_by.is_some() {
            GroupKind::Manual
        } else if start_date.is_some() && end_date.is_some() {
            GroupKind::Timestamp
        } else {
            GroupKind::Institutional
        }
    }
}

/// Group entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub created_by: Option<Uuid>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Group {
    pub fn kind(&self) -> GroupKind {
        GroupKind::classify(self.created_by, self.start_date, self.end_date)
    }

    pub fn window(&self) -> DateWindow {
        DateWindow::new(self.start_date, self.end_date)
    }

    /// Builds the implicit group for an institution key. No validation: the
    /// key is already normalized and non-empty.
    pub fn institutional(key: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: key,
            created_by: None,
            start_date: None,
            end_date: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Group with its current member count, for listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: Group,
    pub kind: GroupKind,
    pub member_count: i64,
}

/// Validated input for creating or editing a group.
#[derive(Debug, Clone, Validate)]
pub struct GroupDraft {
    #[validate(length(min = 1, max = 100, message = "Group name must be between 1 and 100 characters"))]
    pub name: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl GroupDraft {
    /// Normalizes the name and checks the date shape required by `kind`.
    pub fn new(
        kind: GroupKind,
        name: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        let draft = Self {
            name: normalize_group_name(name),
            start_date,
            end_date,
        };
        draft.validate()?;

        match kind {
            GroupKind::Manual => {}
            GroupKind::Timestamp => {
                if start_date.is_none() || end_date.is_none() {
                    return Err(DomainError::validation(
                        "Start and end dates are required for a timestamp group",
                    ));
                }
            }
            GroupKind::Institutional => {
                if start_date.is_some() || end_date.is_some() {
                    return Err(DomainError::validation(
                        "Institutional groups cannot have dates",
                    ));
                }
            }
        }

        if !DateWindow::new(start_date, end_date).is_well_formed() {
            return Err(DomainError::validation("Start date must be before end date"));
        }

        Ok(draft)
    }

    /// Materializes a new group row for `kind`. Only manual groups record a creator.
    pub fn into_group(self, kind: GroupKind, creator: Uuid) -> Group {
        Group {
            id: Uuid::new_v4(),
            name: self.name,
            created_by: (kind == GroupKind::Manual).then_some(creator),
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}
