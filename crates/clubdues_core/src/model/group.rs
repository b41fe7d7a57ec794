//! Group (cohort) record.

use super::{normalize_name, normalize_optional, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable group identifier.
pub type GroupId = Uuid;

/// A named cohort that members belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: GroupId,
    /// Non-empty, trimmed display name.
    pub name: String,
    pub description: Option<String>,
}

impl Group {
    /// Creates a validated group with a freshly generated id.
    pub fn new(name: &str, description: Option<String>) -> Result<Self, ValidationError> {
        Self::with_id(Uuid::new_v4(), name, description)
    }

    /// Creates a validated group for an existing id (edits, imports).
    pub fn with_id(
        group_id: GroupId,
        name: &str,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            group_id,
            name: normalize_name(name, "group")?,
            description: normalize_optional(description),
        })
    }

    /// Re-checks field rules, used on rows read back from storage.
    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_name(&self.name, "group").map(|_| ())
    }
}
