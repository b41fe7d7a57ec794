//! Roster (groups and members) repository contract and SQLite implementation.
//!
//! # Invariants
//! - Member listing order is deterministic: `name ASC, member_uuid ASC`.
//! - Group deletion removes the group and its current members in one
//!   `IMMEDIATE` transaction; either both are gone or neither is.
//! - Member writes never succeed against a missing group.

use super::{
    ensure_connection_ready, group_exists, member_exists, parse_uuid, RepoError, RepoResult,
};
use crate::model::group::{Group, GroupId};
use crate::model::member::{Member, MemberId};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const MEMBER_SELECT_SQL: &str = "SELECT
    member_uuid,
    name,
    birth_date,
    phone,
    group_uuid
FROM members";

/// Repository interface for group and member persistence.
pub trait RosterRepository {
    fn create_group(&self, group: &Group) -> RepoResult<GroupId>;
    /// Replaces name and description of an existing group.
    fn update_group(&self, group: &Group) -> RepoResult<()>;
    /// Deletes a group and every member currently assigned to it.
    ///
    /// Returns the number of members removed.
    fn delete_group_cascade(&self, group_id: GroupId) -> RepoResult<usize>;
    fn get_group(&self, group_id: GroupId) -> RepoResult<Option<Group>>;
    /// Lists groups ordered by name.
    fn list_groups(&self) -> RepoResult<Vec<Group>>;

    fn create_member(&self, member: &Member) -> RepoResult<MemberId>;
    /// Full replacement of member fields, including group assignment.
    fn update_member(&self, member: &Member) -> RepoResult<()>;
    /// Changes only the group assignment of a member.
    fn reassign_member(&self, member_id: MemberId, group_id: GroupId) -> RepoResult<()>;
    fn delete_member(&self, member_id: MemberId) -> RepoResult<()>;
    fn get_member(&self, member_id: MemberId) -> RepoResult<Option<Member>>;
    /// Lists members, optionally restricted to one group, ordered by name.
    fn list_members(&self, group_id: Option<GroupId>) -> RepoResult<Vec<Member>>;
    /// Every member of a group whose name equals `name` (trimmed), by id.
    fn find_members_by_name(&self, group_id: GroupId, name: &str) -> RepoResult<Vec<Member>>;
}

/// SQLite-backed roster repository.
#[derive(Clone, Copy)]
pub struct SqliteRosterRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRosterRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["groups", "members"])?;
        Ok(Self { conn })
    }
}

impl RosterRepository for SqliteRosterRepository<'_> {
    fn create_group(&self, group: &Group) -> RepoResult<GroupId> {
        group.validate()?;
        self.conn.execute(
            "INSERT INTO groups (group_uuid, name, description) VALUES (?1, ?2, ?3);",
            params![
                group.group_id.to_string(),
                group.name.as_str(),
                group.description.as_deref(),
            ],
        )?;
        Ok(group.group_id)
    }

    fn update_group(&self, group: &Group) -> RepoResult<()> {
        group.validate()?;
        let changed = self.conn.execute(
            "UPDATE groups
             SET name = ?2,
                 description = ?3
             WHERE group_uuid = ?1;",
            params![
                group.group_id.to_string(),
                group.name.as_str(),
                group.description.as_deref(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::GroupNotFound(group.group_id));
        }
        Ok(())
    }

    fn delete_group_cascade(&self, group_id: GroupId) -> RepoResult<usize> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !group_exists(&tx, group_id)? {
            return Err(RepoError::GroupNotFound(group_id));
        }

        let removed = tx.execute(
            "DELETE FROM members WHERE group_uuid = ?1;",
            [group_id.to_string()],
        )?;
        tx.execute(
            "DELETE FROM groups WHERE group_uuid = ?1;",
            [group_id.to_string()],
        )?;

        tx.commit()?;
        Ok(removed)
    }

    fn get_group(&self, group_id: GroupId) -> RepoResult<Option<Group>> {
        let row = self
            .conn
            .query_row(
                "SELECT group_uuid, name, description FROM groups WHERE group_uuid = ?1;",
                [group_id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, name, description)| build_group(&id, name, description))
            .transpose()
    }

    fn list_groups(&self) -> RepoResult<Vec<Group>> {
        let mut stmt = self.conn.prepare(
            "SELECT group_uuid, name, description
             FROM groups
             ORDER BY name ASC, group_uuid ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut groups = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("group_uuid")?;
            groups.push(build_group(&id, row.get("name")?, row.get("description")?)?);
        }
        Ok(groups)
    }

    fn create_member(&self, member: &Member) -> RepoResult<MemberId> {
        member.validate()?;
        let changed = self.conn.execute(
            "INSERT INTO members (member_uuid, name, birth_date, phone, group_uuid)
             SELECT ?1, ?2, ?3, ?4, group_uuid
             FROM groups
             WHERE group_uuid = ?5;",
            params![
                member.member_id.to_string(),
                member.name.as_str(),
                member.birth_date,
                member.phone.as_deref(),
                member.group_id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::GroupNotFound(member.group_id));
        }
        Ok(member.member_id)
    }

    fn update_member(&self, member: &Member) -> RepoResult<()> {
        member.validate()?;
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !group_exists(&tx, member.group_id)? {
            return Err(RepoError::GroupNotFound(member.group_id));
        }
        let changed = tx.execute(
            "UPDATE members
             SET name = ?2,
                 birth_date = ?3,
                 phone = ?4,
                 group_uuid = ?5
             WHERE member_uuid = ?1;",
            params![
                member.member_id.to_string(),
                member.name.as_str(),
                member.birth_date,
                member.phone.as_deref(),
                member.group_id.to_string(),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::MemberNotFound(member.member_id));
        }
        tx.commit()?;
        Ok(())
    }

    fn reassign_member(&self, member_id: MemberId, group_id: GroupId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !member_exists(&tx, member_id)? {
            return Err(RepoError::MemberNotFound(member_id));
        }
        if !group_exists(&tx, group_id)? {
            return Err(RepoError::GroupNotFound(group_id));
        }
        tx.execute(
            "UPDATE members SET group_uuid = ?2 WHERE member_uuid = ?1;",
            params![member_id.to_string(), group_id.to_string()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn delete_member(&self, member_id: MemberId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM members WHERE member_uuid = ?1;",
            [member_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::MemberNotFound(member_id));
        }
        Ok(())
    }

    fn get_member(&self, member_id: MemberId) -> RepoResult<Option<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} WHERE member_uuid = ?1;"))?;
        let mut rows = stmt.query([member_id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_member_row(row)?));
        }
        Ok(None)
    }

    fn list_members(&self, group_id: Option<GroupId>) -> RepoResult<Vec<Member>> {
        let mut members = Vec::new();
        match group_id {
            Some(group_id) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{MEMBER_SELECT_SQL}
                     WHERE group_uuid = ?1
                     ORDER BY name ASC, member_uuid ASC;"
                ))?;
                let mut rows = stmt.query([group_id.to_string()])?;
                while let Some(row) = rows.next()? {
                    members.push(parse_member_row(row)?);
                }
            }
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "{MEMBER_SELECT_SQL} ORDER BY name ASC, member_uuid ASC;"
                ))?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    members.push(parse_member_row(row)?);
                }
            }
        }
        Ok(members)
    }

    fn find_members_by_name(&self, group_id: GroupId, name: &str) -> RepoResult<Vec<Member>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBER_SELECT_SQL}
             WHERE group_uuid = ?1
               AND name = ?2
             ORDER BY member_uuid ASC;"
        ))?;
        let mut rows = stmt.query(params![group_id.to_string(), name.trim()])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }
        Ok(members)
    }
}

fn build_group(id: &str, name: String, description: Option<String>) -> RepoResult<Group> {
    let group = Group {
        group_id: parse_uuid(id, "groups.group_uuid")?,
        name,
        description,
    };
    group.validate()?;
    Ok(group)
}

fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let member_text: String = row.get("member_uuid")?;
    let group_text: Option<String> = row.get("group_uuid")?;
    let group_text = group_text.ok_or_else(|| {
        RepoError::InvalidData(format!("member {member_text} has no group assignment"))
    })?;

    let member = Member {
        member_id: parse_uuid(&member_text, "members.member_uuid")?,
        name: row.get("name")?,
        birth_date: row.get("birth_date")?,
        phone: row.get("phone")?,
        group_id: parse_uuid(&group_text, "members.group_uuid")?,
    };
    member.validate()?;
    Ok(member)
}
