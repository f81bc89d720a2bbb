//! # taskdeck - daily to-do list manager
//!
//! A small task list for the terminal: one-shot CLI commands for scripting and
//! an interactive TUI for working through the day.
//!
//! ## Key Features
//!
//! - **Three-state tasks**: every task is "Not done", "Doing right now" or "Done"
//! - **Sort and filter presets**: bring one state to the top, or show only one state
//! - **Atomic saves**: the list on disk always matches what was last shown
//! - **Light and dark schemes**: toggled with Ctrl+J and remembered between runs
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the interactive UI
//! taskdeck ui
//!
//! # Add a task via CLI
//! taskdeck add "Buy milk" --summary "two litres" --state not-done
//!
//! # List tasks, or only the ones in progress
//! taskdeck list
//! taskdeck list --state doing
//!
//! # Mark the first task as done
//! taskdeck state 1 done
//! ```
//!
//! Data is stored in the platform data directory (`taskdeck/tasks.json` and
//! `taskdeck/color-scheme.json`), or wherever `--dir` / `TASKDECK_DIR` points.

use clap::Parser;
use tracing::debug;

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod logging;
pub mod storage;
pub mod store;
pub mod task;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use logging::LogTarget;
use storage::FileStorage;
use store::TaskStore;

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_cli(&cli);

    let target = match cli.command {
        Commands::Ui => LogTarget::File(config.log_file()),
        _ => LogTarget::Stderr,
    };
    if let Err(e) = logging::init(&config.log_level, target) {
        eprintln!("Warning: logging disabled: {e:#}");
    }
    debug!(dir = %config.data_dir.display(), "using data directory");

    let mut storage = FileStorage::open(&config.data_dir)?;

    // Theme never touches the task list.
    if let Commands::Theme { theme } = cli.command {
        return cmd_theme(&mut storage, theme);
    }

    let mut store = TaskStore::open(storage);

    match cli.command {
        Commands::Ui => tui::run::run_tui(store)?,
        Commands::Add { title, summary, state } => cmd_add(&mut store, title, summary, state)?,
        Commands::List { state } => cmd_list(&mut store, state)?,
        Commands::Edit { position, title, summary, state } => {
            cmd_edit(&mut store, position, title, summary, state)?
        }
        Commands::State { position, state } => cmd_state(&mut store, position, state)?,
        Commands::Delete { position } => cmd_delete(&mut store, position)?,
        Commands::Sort { state } => cmd_sort(&mut store, state)?,
        Commands::Theme { .. } => unreachable!("theme command handled above"),
        Commands::Completions { .. } => unreachable!("completions handled in main"),
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    // Completions need no data directory.
    if let Commands::Completions { shell } = cli.command {
        cmd_completions(shell);
        return;
    }

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
