//! Roster use-case service: groups, members and reassignment.
//!
//! # Invariants
//! - Group and member names are trimmed and must not be blank.
//! - Deleting a group deletes its current members atomically.
//! - Reassigning a member touches only `group_id`; payment history stays.
//! - Deleting a member leaves its payment rows in place.

use crate::error::{ClubError, ClubResult};
use crate::model::group::{Group, GroupId};
use crate::model::member::{Member, MemberDraft, MemberId};
use crate::repo::roster_repo::RosterRepository;
use crate::service::single_named_member;
use log::info;

/// Roster service facade over a repository implementation.
pub struct RosterService<R: RosterRepository> {
    repo: R,
}

impl<R: RosterRepository> RosterService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a group and returns its id.
    pub fn create_group(&self, name: &str, description: Option<String>) -> ClubResult<GroupId> {
        let group = Group::new(name, description)?;
        let group_id = self.repo.create_group(&group)?;
        info!("event=group_create module=roster status=ok group_id={group_id}");
        Ok(group_id)
    }

    /// Replaces name and description of an existing group.
    pub fn update_group(
        &self,
        group_id: GroupId,
        name: &str,
        description: Option<String>,
    ) -> ClubResult<()> {
        let group = Group::with_id(group_id, name, description)?;
        self.repo.update_group(&group)?;
        info!("event=group_update module=roster status=ok group_id={group_id}");
        Ok(())
    }

    /// Deletes a group together with every member currently assigned to it.
    ///
    /// Returns the number of members removed.
    pub fn delete_group(&self, group_id: GroupId) -> ClubResult<usize> {
        let removed = self.repo.delete_group_cascade(group_id)?;
        info!(
            "event=group_delete module=roster status=ok group_id={group_id} members_removed={removed}"
        );
        Ok(removed)
    }

    pub fn get_group(&self, group_id: GroupId) -> ClubResult<Option<Group>> {
        Ok(self.repo.get_group(group_id)?)
    }

    /// Lists all groups sorted by name.
    pub fn list_groups(&self) -> ClubResult<Vec<Group>> {
        Ok(self.repo.list_groups()?)
    }

    /// Adds a member to an existing group.
    pub fn add_member(&self, draft: MemberDraft, group_id: GroupId) -> ClubResult<MemberId> {
        let member = Member::new(draft, group_id)?;
        let member_id = self.repo.create_member(&member)?;
        info!(
            "event=member_create module=roster status=ok member_id={member_id} group_id={group_id}"
        );
        Ok(member_id)
    }

    /// Replaces all editable fields of a member, including its group.
    pub fn update_member(
        &self,
        member_id: MemberId,
        draft: MemberDraft,
        group_id: GroupId,
    ) -> ClubResult<()> {
        let member = Member::with_id(member_id, draft, group_id)?;
        self.repo.update_member(&member)?;
        info!("event=member_update module=roster status=ok member_id={member_id}");
        Ok(())
    }

    /// Moves a member to another group.
    pub fn reassign_member(&self, member_id: MemberId, new_group_id: GroupId) -> ClubResult<()> {
        self.repo.reassign_member(member_id, new_group_id)?;
        info!(
            "event=member_reassign module=roster status=ok member_id={member_id} group_id={new_group_id}"
        );
        Ok(())
    }

    /// Removes a member. Payments recorded for it are kept.
    pub fn delete_member(&self, member_id: MemberId) -> ClubResult<()> {
        self.repo.delete_member(member_id)?;
        info!("event=member_delete module=roster status=ok member_id={member_id}");
        Ok(())
    }

    pub fn get_member(&self, member_id: MemberId) -> ClubResult<Option<Member>> {
        Ok(self.repo.get_member(member_id)?)
    }

    /// Lists members sorted by name, optionally restricted to one group.
    pub fn list_members(&self, group_id: Option<GroupId>) -> ClubResult<Vec<Member>> {
        if let Some(group_id) = group_id {
            self.ensure_group(group_id)?;
        }
        Ok(self.repo.list_members(group_id)?)
    }

    /// Case-insensitive name substring search within `list_members` order.
    ///
    /// A blank query returns the unfiltered listing.
    pub fn search_members(&self, group_id: Option<GroupId>, query: &str) -> ClubResult<Vec<Member>> {
        let needle = query.trim().to_lowercase();
        let members = self.list_members(group_id)?;
        if needle.is_empty() {
            return Ok(members);
        }
        Ok(members
            .into_iter()
            .filter(|member| member.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Resolves a member by exact (trimmed) name within a group.
    ///
    /// Fails with `AmbiguousMemberName` when the name is shared.
    pub fn find_member_by_name(&self, group_id: GroupId, name: &str) -> ClubResult<Member> {
        self.ensure_group(group_id)?;
        let matches = self.repo.find_members_by_name(group_id, name)?;
        single_named_member(group_id, name, matches)
    }

    fn ensure_group(&self, group_id: GroupId) -> ClubResult<()> {
        self.repo
            .get_group(group_id)?
            .map(|_| ())
            .ok_or(ClubError::GroupNotFound(group_id))
    }
}
