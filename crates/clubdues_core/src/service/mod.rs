//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the roster, ledger and reporting APIs.
//! - Keep CLI/presentation layers decoupled from storage details.
//!
//! # Invariants
//! - Services carry no ambient state; group, period and store are passed in.
//! - The unpaid definition lives only in `LedgerService`.

pub mod ledger_service;
pub mod report_service;
pub mod roster_service;

use crate::error::{ClubError, ClubResult};
use crate::model::group::GroupId;
use crate::model::member::Member;

/// Narrows an exact-name lookup to a single member.
pub(crate) fn single_named_member(
    group_id: GroupId,
    name: &str,
    mut matches: Vec<Member>,
) -> ClubResult<Member> {
    let name = name.trim().to_string();
    match matches.len() {
        0 => Err(ClubError::MemberNameNotFound { group_id, name }),
        1 => Ok(matches.remove(0)),
        _ => Err(ClubError::AmbiguousMemberName {
            group_id,
            name,
            candidates: matches.into_iter().map(|member| member.member_id).collect(),
        }),
    }
}
