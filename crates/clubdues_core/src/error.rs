//! Service-level error taxonomy.
//!
//! Every Roster/Ledger/Report operation returns `ClubResult`. Recoverable
//! conditions (`Validation`, `*NotFound`, `Duplicate`) are distinct variants
//! so callers can show informational messages; storage failures surface as
//! `StoreUnavailable` and are never folded into empty results.

use crate::db::DbError;
use crate::model::group::GroupId;
use crate::model::member::MemberId;
use crate::model::period::Period;
use crate::model::ValidationError;
use crate::repo::RepoError;

pub type ClubResult<T> = Result<T, ClubError>;

#[derive(Debug, thiserror::Error)]
pub enum ClubError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("group not found: {0}")]
    GroupNotFound(GroupId),
    #[error("member not found: {0}")]
    MemberNotFound(MemberId),
    /// Member lookup by name within a group found nothing.
    #[error("no member named `{name}` in group {group_id}")]
    MemberNameNotFound { group_id: GroupId, name: String },
    /// Name lookup matched more than one member; the caller must pick by id.
    #[error("{} members named `{name}` in group {group_id}; select one by id", .candidates.len())]
    AmbiguousMemberName {
        group_id: GroupId,
        name: String,
        candidates: Vec<MemberId>,
    },
    #[error("payment for member {member_id} in {period} is already recorded")]
    Duplicate { member_id: MemberId, period: Period },
    #[error("entity store unavailable: {0}")]
    StoreUnavailable(#[source] RepoError),
    #[error("{0}")]
    InvalidData(String),
}

impl ClubError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::GroupNotFound(_) | Self::MemberNotFound(_) | Self::MemberNameNotFound { .. }
        )
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<RepoError> for ClubError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::GroupNotFound(id) => Self::GroupNotFound(id),
            RepoError::MemberNotFound(id) => Self::MemberNotFound(id),
            RepoError::DuplicatePayment { member_id, period } => {
                Self::Duplicate { member_id, period }
            }
            RepoError::InvalidData(message) => Self::InvalidData(message),
            RepoError::Db(DbError::Sqlite(err)) if is_constraint_violation(&err) => {
                Self::InvalidData(format!("store rejected the change: {err}"))
            }
            other => Self::StoreUnavailable(other),
        }
    }
}

/// CHECK, NOT NULL, FOREIGN KEY and trigger aborts: the store is reachable
/// but refused the write.
fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

impl From<DbError> for ClubError {
    fn from(value: DbError) -> Self {
        Self::StoreUnavailable(RepoError::Db(value))
    }
}
