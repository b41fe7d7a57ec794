use crate::cli::GroupCommand;
use crate::config::Settings;
use crate::output::emit;
use anyhow::Result;
use clubdues_core::db::Connection;
use clubdues_core::{Group, RosterService, SqliteRosterRepository, Table};

pub fn run(conn: &Connection, settings: &Settings, cmd: GroupCommand) -> Result<()> {
    let roster = RosterService::new(SqliteRosterRepository::try_new(conn)?);
    match cmd {
        GroupCommand::List => {
            let groups = roster.list_groups()?;
            emit(settings.json, &groups, &groups_table(&groups))
        }
        GroupCommand::Add { name, description } => {
            let group_id = roster.create_group(&name, description)?;
            println!("Group created: {group_id}");
            Ok(())
        }
        GroupCommand::Update {
            group_id,
            name,
            description,
        } => {
            roster.update_group(group_id, &name, description)?;
            println!("Group updated: {group_id}");
            Ok(())
        }
        GroupCommand::Delete { group_id } => {
            let removed = roster.delete_group(group_id)?;
            let member_text = if removed == 1 {
                "1 member".to_string()
            } else {
                format!("{removed} members")
            };
            println!("Group deleted: {group_id} ({member_text} removed)");
            Ok(())
        }
    }
}

fn groups_table(groups: &[Group]) -> Table {
    Table {
        columns: vec!["id".to_string(), "name".to_string(), "description".to_string()],
        rows: groups
            .iter()
            .map(|group| {
                vec![
                    group.group_id.to_string(),
                    group.name.clone(),
                    group.description.clone().unwrap_or_default(),
                ]
            })
            .collect(),
    }
}
