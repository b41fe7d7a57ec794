//! Member record.

use super::group::GroupId;
use super::{normalize_name, normalize_optional, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable member identifier.
pub type MemberId = Uuid;

/// A tracked individual assigned to exactly one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    /// Current group. Historical assignments are not tracked.
    pub group_id: GroupId,
}

/// Caller-supplied member fields for create and full-replacement edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberDraft {
    pub name: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
}

impl MemberDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl Member {
    /// Builds a validated member with a freshly generated id.
    pub fn new(draft: MemberDraft, group_id: GroupId) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), draft, group_id)
    }

    /// Builds a validated member for an existing id.
    pub fn with_id(
        member_id: MemberId,
        draft: MemberDraft,
        group_id: GroupId,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            member_id,
            name: normalize_name(&draft.name, "member")?,
            birth_date: draft.birth_date,
            phone: normalize_optional(draft.phone),
            group_id,
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_name(&self.name, "member").map(|_| ())
    }
}
