//! Plain-text and JSON rendering of report tables.

use anyhow::Result;
use clubdues_core::Table;
use serde::Serialize;

/// Renders `table` as aligned text columns.
pub fn render_table(table: &Table) -> String {
    let mut widths: Vec<usize> = table.columns.iter().map(|column| column.chars().count()).collect();
    for row in &table.rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    push_line(&mut out, &table.columns, &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &table.rows {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Prints a table, or `value` as pretty JSON when `json` is set.
pub fn emit<T: Serialize>(json: bool, value: &T, table: &Table) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else if table.is_empty() {
        print!("{}", render_table(table));
        println!("(no rows)");
    } else {
        print!("{}", render_table(table));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::render_table;
    use clubdues_core::Table;

    #[test]
    fn columns_align_to_widest_cell() {
        let table = Table {
            columns: vec!["member".to_string(), "paid".to_string()],
            rows: vec![
                vec!["Alexandra".to_string(), "yes".to_string()],
                vec!["Bo".to_string(), "no".to_string()],
            ],
        };
        let text = render_table(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "member     paid");
        assert_eq!(lines[1], "---------  ----");
        assert_eq!(lines[2], "Alexandra  yes");
        assert_eq!(lines[3], "Bo         no");
    }
}
