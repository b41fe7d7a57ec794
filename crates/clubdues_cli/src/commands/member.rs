use crate::cli::MemberCommand;
use crate::config::Settings;
use crate::output::emit;
use anyhow::Result;
use clubdues_core::db::Connection;
use clubdues_core::{
    MemberDraft, RosterService, RosterSheet, SqliteRosterRepository, TabularReport,
};

pub fn run(conn: &Connection, settings: &Settings, cmd: MemberCommand) -> Result<()> {
    let roster = RosterService::new(SqliteRosterRepository::try_new(conn)?);
    match cmd {
        MemberCommand::List { group } => {
            let sheet = RosterSheet {
                members: roster.list_members(group)?,
            };
            emit(settings.json, &sheet.members, &sheet.to_table())
        }
        MemberCommand::Search { query, group } => {
            let sheet = RosterSheet {
                members: roster.search_members(group, &query)?,
            };
            emit(settings.json, &sheet.members, &sheet.to_table())
        }
        MemberCommand::Add {
            group_id,
            name,
            birth_date,
            phone,
        } => {
            let draft = MemberDraft {
                name,
                birth_date,
                phone,
            };
            let member_id = roster.add_member(draft, group_id)?;
            println!("Member created: {member_id}");
            Ok(())
        }
        MemberCommand::Update {
            member_id,
            group_id,
            name,
            birth_date,
            phone,
        } => {
            let draft = MemberDraft {
                name,
                birth_date,
                phone,
            };
            roster.update_member(member_id, draft, group_id)?;
            println!("Member updated: {member_id}");
            Ok(())
        }
        MemberCommand::Move {
            member_id,
            group_id,
        } => {
            roster.reassign_member(member_id, group_id)?;
            println!("Member {member_id} moved to group {group_id}");
            Ok(())
        }
        MemberCommand::Delete { member_id } => {
            roster.delete_member(member_id)?;
            println!("Member deleted: {member_id}");
            Ok(())
        }
    }
}
