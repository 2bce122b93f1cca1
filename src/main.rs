//! # Daybook
//!
//! A terminal to-do manager organised around days. Tasks are scheduled for a
//! day ("when") or left in the inbox, and are shown in Today, Inbox and All
//! lists, each split into available and completed tasks.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! daybook
//! # or explicitly, starting on the inbox
//! daybook ui --view inbox
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `q`: Quit
//! *   `j`/`k`: Move selection
//! *   `Space`: Toggle completion
//! *   `a`: Add a task to the current view
//! *   `d`: Delete selected task
//! *   `n`/`w`/`o`: Edit name, day, notes
//! *   `p`: Cycle priority
//! *   `t`: Add tag
//! *   `x`: Add checklist item
//! *   `c`: Toggle Show/Hide Completed Tasks
//! *   `v`: Cycle Today / Inbox / All
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! daybook list --view inbox
//! daybook --file tasks.json complete 2
//! daybook --file - update 3 --when tomorrow --priority high < tasks.json
//! daybook apply complete '{"id": 1, "completed": true}'
//! ```
//!
//! Mutating commands print the resulting collection as JSON. Nothing is saved.
//!
//! ## Task Source
//!
//! Tasks are read from the `--file` path (`-` for stdin), the `DAYBOOK_TASKS`
//! environment variable, or `~/.local/share/daybook/tasks.json` when present.
//! Without any of these a built-in sample collection is used.

use std::io;
use std::path::PathBuf;

use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use eyre::{eyre, Result};

use daybook::commands::*;
use daybook::logging::init_logging;
use daybook::models::{Task, TaskAction, ViewFilter};
use daybook::storage::{load_tasks, read_tasks};
use daybook::tui::run_tui;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Day-based terminal task manager", long_about = None)]
struct Cli {
    /// Task file to read (JSON array). Use '-' for stdin
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,
    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available and completed tasks of a view
    List {
        /// today, tomorrow, inbox, all or YYYY-MM-DD
        #[arg(long, default_value = "today")]
        view: String,
    },
    /// Append a blank task
    New {
        /// today, tomorrow, inbox or YYYY-MM-DD
        #[arg(short, long)]
        when: Option<String>,
    },
    /// Select a task, deselecting every other
    Select {
        id: u64,
    },
    /// Remove a task
    Delete {
        id: u64,
    },
    /// Mark a task as complete
    Complete {
        id: u64,
        /// Mark the task as not complete instead
        #[arg(short, long)]
        undo: bool,
    },
    /// Edit a task
    Update {
        id: u64,
        /// New task name
        #[arg(short, long)]
        name: Option<String>,
        /// New day: today, tomorrow, inbox or YYYY-MM-DD
        #[arg(short, long, conflicts_with = "clear_when")]
        when: Option<String>,
        /// Move the task back to the inbox
        #[arg(long)]
        clear_when: bool,
        /// New notes
        #[arg(short = 'o', long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        #[arg(long)]
        clear_notes: bool,
        /// low, medium or high
        #[arg(short, long, conflicts_with = "clear_priority")]
        priority: Option<String>,
        #[arg(long)]
        clear_priority: bool,
        /// Replace tags (repeatable)
        #[arg(short, long = "tag", conflicts_with = "clear_tags")]
        tags: Vec<String>,
        #[arg(long)]
        clear_tags: bool,
    },
    /// Edit a task's checklist
    Check {
        id: u64,
        #[command(subcommand)]
        command: CheckCommands,
    },
    /// Apply a named action with a JSON payload
    Apply {
        /// select, delete, update or complete
        action: String,
        /// Task id, or a JSON object for update and complete
        payload: String,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui {
        /// View to open: today, inbox, all or YYYY-MM-DD
        #[arg(long, default_value = "today")]
        view: String,
    },
}

#[derive(Subcommand)]
enum CheckCommands {
    /// Add a checklist item
    Add {
        name: String,
    },
    /// Mark an item as done
    Done {
        item: u64,
    },
    /// Mark an item as not done
    Undo {
        item: u64,
    },
    /// Remove an item
    Remove {
        item: u64,
    },
}

fn load(cli_file: &Option<PathBuf>, view: &ViewFilter) -> Result<Vec<Task>> {
    let today = Local::now().date_naive();
    let tasks = match cli_file {
        Some(p) if p.as_os_str() == "-" => read_tasks(io::stdin().lock())?,
        other => load_tasks(other.as_deref(), view, today)?,
    };
    Ok(tasks)
}

fn print_json(tasks: &[Task]) -> Result<()> {
    println!("{}", to_json(tasks)?);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let today = Local::now().date_naive();
    let default_view = ViewFilter::Day(today);

    match cli.command {
        Some(Commands::List { view }) => {
            let view = ViewFilter::parse(&view, today)?;
            let tasks = load(&cli.file, &view)?;
            print!("{}", cmd_list(&tasks, &view, today));
        }
        Some(Commands::New { when }) => {
            let tasks = load(&cli.file, &default_view)?;
            print_json(&cmd_new(&tasks, when.as_deref(), today)?)?;
        }
        Some(Commands::Select { id }) => {
            let tasks = load(&cli.file, &default_view)?;
            print_json(&cmd_action(&tasks, &TaskAction::Select(id))?)?;
        }
        Some(Commands::Delete { id }) => {
            let tasks = load(&cli.file, &default_view)?;
            print_json(&cmd_action(&tasks, &TaskAction::Delete(id))?)?;
        }
        Some(Commands::Complete { id, undo }) => {
            let tasks = load(&cli.file, &default_view)?;
            let action = TaskAction::Complete { id, completed: !undo };
            print_json(&cmd_action(&tasks, &action)?)?;
        }
        Some(Commands::Update {
            id,
            name,
            when,
            clear_when,
            notes,
            clear_notes,
            priority,
            clear_priority,
            tags,
            clear_tags,
        }) => {
            let tasks = load(&cli.file, &default_view)?;
            let fields = UpdateFields {
                name,
                when,
                clear_when,
                notes,
                clear_notes,
                priority,
                clear_priority,
                tags,
                clear_tags,
            };
            print_json(&cmd_update(&tasks, id, fields, today)?)?;
        }
        Some(Commands::Check { id, command }) => {
            let tasks = load(&cli.file, &default_view)?;
            let op = match command {
                CheckCommands::Add { name } => ChecklistOp::Add(name),
                CheckCommands::Done { item } => ChecklistOp::Done(item),
                CheckCommands::Undo { item } => ChecklistOp::Undo(item),
                CheckCommands::Remove { item } => ChecklistOp::Remove(item),
            };
            print_json(&cmd_checklist(&tasks, id, op)?)?;
        }
        Some(Commands::Apply { action, payload }) => {
            let tasks = load(&cli.file, &default_view)?;
            print_json(&cmd_apply(&tasks, &action, &payload)?)?;
        }
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => return Err(eyre!("Unsupported shell: {}", shell)),
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "daybook", &mut io::stdout());
        }
        Some(Commands::Ui { view }) => {
            let view = ViewFilter::parse(&view, today)?;
            let tasks = load(&cli.file, &view)?;
            run_tui(tasks, view, today).map_err(|e| eyre!("Error running TUI: {}", e))?;
        }
        None => {
            let tasks = load(&cli.file, &default_view)?;
            run_tui(tasks, default_view, today).map_err(|e| eyre!("Error running TUI: {}", e))?;
        }
    }
    Ok(())
}
