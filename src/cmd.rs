//! Command implementations for the CLI interface.
//!
//! Each handler takes an open `TaskStore`, runs exactly one store operation
//! and prints the result. Positions on the command line are 1-based, the way
//! `list` prints them; the store itself is indexed from 0.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::fields::{TaskState, Theme};
use crate::storage::{load_theme, save_theme, Storage};
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI interface.
    Ui,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional one-line summary.
        #[arg(long)]
        summary: Option<String>,
        /// State: done | not-done | doing-right-now.
        #[arg(long, value_enum)]
        state: TaskState,
    },

    /// List tasks, optionally showing only one state.
    List {
        /// Show only tasks in this state. The stored list is not changed.
        #[arg(long, value_enum)]
        state: Option<TaskState>,
    },

    /// Replace a task's title, summary and state.
    Edit {
        /// Position as printed by `list`.
        position: usize,
        /// New title.
        title: String,
        /// New summary. Omitting it clears the summary.
        #[arg(long)]
        summary: Option<String>,
        /// New state.
        #[arg(long, value_enum)]
        state: TaskState,
    },

    /// Change only the state of a task.
    State {
        /// Position as printed by `list`.
        position: usize,
        #[arg(value_enum)]
        state: TaskState,
    },

    /// Delete a task.
    Delete {
        /// Position as printed by `list`.
        position: usize,
    },

    /// Move every task in the given state to the top and save the new order.
    Sort {
        #[arg(value_enum)]
        state: TaskState,
    },

    /// Set the colour scheme, or toggle it when no value is given.
    Theme {
        #[arg(value_enum)]
        theme: Option<Theme>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Convert a 1-based CLI position to a store index.
pub fn position_to_index(position: usize) -> Result<usize> {
    match position.checked_sub(1) {
        Some(index) => Ok(index),
        None => bail!("positions start at 1"),
    }
}

/// Add a new task to the end of the list.
pub fn cmd_add<S: Storage>(
    store: &mut TaskStore<S>,
    title: String,
    summary: Option<String>,
    state: TaskState,
) -> Result<()> {
    let draft = TaskDraft {
        title,
        summary,
        state: Some(state),
    };
    let list = store.create(draft).context("could not add task")?;
    println!("Added task {}", list.len());
    Ok(())
}

/// Print the visible list, filtered to `state` when given.
pub fn cmd_list<S: Storage>(store: &mut TaskStore<S>, state: Option<TaskState>) -> Result<()> {
    if let Some(s) = state {
        store.filter_by_state(s);
    }
    print_table(&numbered_rows(store));
    Ok(())
}

/// Visible tasks paired with their 1-based position in the stored list.
///
/// Every CLI run opens an unfiltered store, so these are the numbers that
/// `edit`, `state` and `delete` resolve against, even when `list` filtered.
pub fn numbered_rows<S: Storage>(store: &TaskStore<S>) -> Vec<(usize, &Task)> {
    let filter = store.filter();
    store
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| filter.map_or(true, |s| e.task.state == s))
        .map(|(i, e)| (i + 1, &e.task))
        .collect()
}

pub fn cmd_edit<S: Storage>(
    store: &mut TaskStore<S>,
    position: usize,
    title: String,
    summary: Option<String>,
    state: TaskState,
) -> Result<()> {
    let index = position_to_index(position)?;
    let draft = TaskDraft {
        title,
        summary,
        state: Some(state),
    };
    store
        .edit(index, draft)
        .with_context(|| format!("could not edit task {position}"))?;
    println!("Updated task {position}");
    Ok(())
}

pub fn cmd_state<S: Storage>(store: &mut TaskStore<S>, position: usize, state: TaskState) -> Result<()> {
    let index = position_to_index(position)?;
    store
        .update_state(index, state)
        .with_context(|| format!("could not change state of task {position}"))?;
    println!("Task {position} is now {state}");
    Ok(())
}

pub fn cmd_delete<S: Storage>(store: &mut TaskStore<S>, position: usize) -> Result<()> {
    let index = position_to_index(position)?;
    let removed = store
        .id_at(index)
        .ok()
        .and_then(|id| store.get(id))
        .map(|t| t.title.clone());
    store
        .delete(index)
        .with_context(|| format!("could not delete task {position}"))?;
    match removed {
        Some(title) => println!("Deleted task {position}: {title}"),
        None => println!("Deleted task {position}"),
    }
    Ok(())
}

pub fn cmd_sort<S: Storage>(store: &mut TaskStore<S>, state: TaskState) -> Result<()> {
    store.sort_by_state(state).context("could not sort tasks")?;
    print_table(&numbered_rows(store));
    Ok(())
}

/// Set or toggle the stored colour scheme.
pub fn cmd_theme<S: Storage>(storage: &mut S, theme: Option<Theme>) -> Result<()> {
    let next = theme.unwrap_or_else(|| load_theme(storage).toggle());
    save_theme(storage, next).context("could not save colour scheme")?;
    println!("Colour scheme: {}", next.label());
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Print numbered tasks as a table. Untitled tasks keep their position but
/// are not shown.
pub fn print_table(rows: &[(usize, &Task)]) {
    if rows.iter().all(|(_, t)| !t.is_renderable()) {
        println!("You have no tasks");
        return;
    }
    println!("{:<4} {:<16} {}", "#", "State", "Title");
    for (position, t) in rows {
        if !t.is_renderable() {
            continue;
        }
        println!("{:<4} {:<16} {}", position, t.state.label(), t.title);
        println!("{:<4} {:<16} {}", "", "", truncate(t.display_summary(), 60));
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
