//! Show command implementation

use std::path::Path;

use colored::Colorize;

use fssp_core::RuleTable;
use fssp_fs::load_records;

use crate::display_path;
use crate::error::{CliError, Result};

/// Print the tables of a record file grouped by quiescent count
pub fn run_show(path: &Path, index: Option<usize>) -> Result<()> {
    let log = load_records(path)?;

    println!("{} {}", "=>".blue().bold(), log.name().bold());
    println!("   {} {}", "file".dimmed(), display_path(path));
    for (key, value) in log.params.entries() {
        println!("   {} = {}", key.cyan(), value);
    }
    let status = if log.complete {
        "complete".green()
    } else {
        "interrupted".yellow()
    };
    println!("   {} tables, {}", log.tables.len(), status);

    match index {
        Some(id) => {
            let held = log.tables.len();
            let table = id
                .checked_sub(1)
                .and_then(|i| log.tables.get(i))
                .ok_or_else(|| CliError::user(format!("no ruleset {id}; the file holds {held}")))?;
            print_table(id, table);
        }
        None => {
            for (i, table) in log.tables.iter().enumerate() {
                print_table(i + 1, table);
            }
        }
    }
    Ok(())
}

fn print_table(id: usize, table: &RuleTable) {
    println!();
    println!("{} {} ({} rules)", "Ruleset".green().bold(), id, table.len());
    for (quiescent, group) in table.distribution().iter().enumerate() {
        if group.is_empty() {
            continue;
        }
        let rules: Vec<String> = group
            .iter()
            .map(|(window, symbol)| format!("{window}:{symbol}"))
            .collect();
        println!("[{quiescent}] {}", rules.join(","));
    }
}
