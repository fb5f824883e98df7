use anyhow::{Result, bail};
use chrono::Local;
use std::collections::HashSet;
use std::env;

use crate::config::{self, Config, load_config};
use crate::input::quick_add::parse_quick_add;
use crate::models::Task;
use crate::storage::FileStorage;
use crate::store::TaskStore;
use crate::view::{SortMode, StatusFilter, compute_view};

/// Handle CLI commands
/// Returns true when the TUI should run, false when the command was handled
pub fn handle_cli() -> Result<bool> {
    let args: Vec<String> = env::args().collect();

    // No arguments: enter the TUI
    if args.len() < 2 {
        return Ok(true);
    }

    match args[1].as_str() {
        "add" => {
            if args.len() < 3 {
                eprintln!("Usage: doa add <text> [@YYYY-MM-DD] [!priority] [#tag] [+category]");
                std::process::exit(1);
            }
            if let Err(e) = cli_add(&args[2..]) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
        "list" => {
            if let Err(e) = cli_list(&args[2..]) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
        "done" => {
            if args.len() < 3 {
                eprintln!("Usage: doa done <id>...");
                std::process::exit(1);
            }
            if let Err(e) = cli_done(&args[2..]) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
        "rm" => {
            if args.len() < 3 {
                eprintln!("Usage: doa rm <id>...");
                std::process::exit(1);
            }
            if let Err(e) = cli_rm(&args[2..]) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
            Ok(false)
        }
        "config" => {
            if args.len() < 3 {
                config::show_config()?;
            } else {
                match args[2].as_str() {
                    "show" => config::show_config()?,
                    "categories" => {
                        if args.len() < 4 {
                            eprintln!("Usage: doa config categories <name,name,...>");
                            std::process::exit(1);
                        }
                        config::set_categories(&args[3..].join(" "))?;
                    }
                    "data-dir" => {
                        if args.len() < 4 {
                            eprintln!("Usage: doa config data-dir <path>");
                            std::process::exit(1);
                        }
                        config::set_data_dir(&args[3])?;
                    }
                    _ => {
                        eprintln!("Unknown config option: {}", args[2]);
                        eprintln!("Available options: show, categories, data-dir");
                        std::process::exit(1);
                    }
                }
            }
            Ok(false)
        }
        "--help" | "-h" => {
            print_help();
            Ok(false)
        }
        "--version" | "-V" | "-v" => {
            println!("doa {}", env!("CARGO_PKG_VERSION"));
            Ok(false)
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            eprintln!("Run 'doa --help' for usage");
            std::process::exit(1);
        }
    }
}

fn open_store() -> Result<(Config, TaskStore)> {
    let config = load_config()?;
    let storage = FileStorage::new(config.data_dir());
    let store = TaskStore::load(Box::new(storage))?;
    Ok((config, store))
}

fn cli_add(args: &[String]) -> Result<()> {
    let (config, mut store) = open_store()?;

    let mut draft = parse_quick_add(&args.join(" "))?;
    draft.category = config.normalize_category(&draft.category);

    let task = store.add_draft(draft)?;
    println!("Added task {}: {}", task.id, task.text);
    if let Some(deadline) = task.deadline {
        println!("  due {}", deadline.format("%Y-%m-%d"));
    }

    Ok(())
}

fn cli_list(args: &[String]) -> Result<()> {
    let (_, store) = open_store()?;

    let filter = match parse_flag(args, "--filter") {
        Some(raw) => raw
            .parse::<StatusFilter>()
            .map_err(|e| anyhow::anyhow!(e))?,
        None => StatusFilter::All,
    };
    let sort = match parse_flag(args, "--sort") {
        Some(raw) => raw.parse::<SortMode>().map_err(|e| anyhow::anyhow!(e))?,
        None => SortMode::Date,
    };
    let search = parse_flag(args, "--search").unwrap_or_default();

    let today = Local::now().date_naive();
    let view = compute_view(store.tasks(), filter, &search, sort, today);

    if view.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    println!("{:<14}  {:<3}  {:<8}  {:<10}  TEXT", "ID", "", "PRI", "DEADLINE");
    println!("{:-<14}  {:-<3}  {:-<8}  {:-<10}  {:-<30}", "", "", "", "", "");
    for task in &view {
        println!("{}", format_row(task, today));
    }
    println!();
    println!("{} task(s)", view.len());

    Ok(())
}

fn format_row(task: &Task, today: chrono::NaiveDate) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let deadline = match task.deadline {
        Some(d) if task.is_overdue(today) => format!("{}!", d.format("%Y-%m-%d")),
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    };

    let mut extras = String::new();
    for tag in &task.tags {
        extras.push_str(&format!(" #{}", tag));
    }
    if task.category != crate::models::DEFAULT_CATEGORY {
        extras.push_str(&format!(" +{}", task.category));
    }

    format!(
        "{:<14}  {:<3}  {:<8}  {:<10}  {}{}",
        task.id, check, task.priority, deadline, task.text, extras
    )
}

fn cli_done(args: &[String]) -> Result<()> {
    let (_, mut store) = open_store()?;
    let ids = parse_ids(args)?;

    let known: Vec<i64> = ids.iter().copied().filter(|id| store.get(*id).is_some()).collect();
    store.bulk_complete(&ids)?;

    println!("Completed {} task(s)", known.len());
    Ok(())
}

fn cli_rm(args: &[String]) -> Result<()> {
    let (_, mut store) = open_store()?;
    let ids = parse_ids(args)?;

    let before = store.len();
    store.bulk_delete(&ids)?;

    println!("Deleted {} task(s)", before - store.len());
    Ok(())
}

/// Parse the value following a `--flag` argument
fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_ids(args: &[String]) -> Result<HashSet<i64>> {
    let mut ids = HashSet::new();
    for arg in args {
        match arg.parse::<i64>() {
            Ok(id) => {
                ids.insert(id);
            }
            Err(_) => bail!("invalid task id: {}", arg),
        }
    }
    Ok(ids)
}

fn print_help() {
    println!(
        "doable - terminal todo list

USAGE:
    doa                      Start the interactive TUI
    doa add <text...>        Add a task (quick-add markers allowed)
    doa list [options]       Print tasks
    doa done <id>...         Mark tasks completed
    doa rm <id>...           Delete tasks
    doa config [show]        Show configuration
    doa config categories <name,name,...>
    doa config data-dir <path>

LIST OPTIONS:
    --filter all|pending|completed|overdue
    --search <text>
    --sort date|alphabetical

QUICK-ADD MARKERS:
    @2024-06-01              Deadline
    !low !medium !high       Priority
    #tag                     Tag (repeatable)
    +Category                Category

EXAMPLES:
    doa add Buy milk @2024-06-01 !high #errand +Shopping
    doa list --filter overdue --sort date
    doa done 1717232000000"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flag_finds_value() {
        let args = strings(&["--filter", "overdue", "--sort", "alpha"]);
        assert_eq!(parse_flag(&args, "--filter").as_deref(), Some("overdue"));
        assert_eq!(parse_flag(&args, "--sort").as_deref(), Some("alpha"));
        assert_eq!(parse_flag(&args, "--search"), None);
    }

    #[test]
    fn test_parse_flag_at_end_without_value() {
        let args = strings(&["--filter"]);
        assert_eq!(parse_flag(&args, "--filter"), None);
    }

    #[test]
    fn test_parse_ids_rejects_non_numeric() {
        assert!(parse_ids(&strings(&["12", "34"])).is_ok());
        assert!(parse_ids(&strings(&["12", "abc"])).is_err());
    }

    #[test]
    fn test_format_row_marks_overdue() {
        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut draft = crate::models::TaskDraft::new("dentist");
        draft.deadline = chrono::NaiveDate::from_ymd_opt(2024, 1, 1);
        let task = Task::new(1, draft);

        let row = format_row(&task, today);
        assert!(row.contains("2024-01-01!"));
        assert!(row.contains("[ ]"));
        assert!(row.contains("dentist"));
    }
}
