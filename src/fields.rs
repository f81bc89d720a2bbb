//! Enumerations and field types for task management.
//!
//! This module defines the structured values a task or the interface can take:
//! the three task states and the light/dark colour scheme.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Task completion state.
///
/// Serialised with the human labels the storage slot has always used, so the
/// JSON reads `"Not done"` rather than `"not-done"`. On the command line the
/// kebab-case names apply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
pub enum TaskState {
    #[serde(rename = "Done")]
    Done,
    #[serde(rename = "Not done")]
    NotDone,
    #[serde(rename = "Doing right now")]
    #[value(alias = "doing")]
    DoingRightNow,
}

impl TaskState {
    /// Every state, in the order the create form offers them.
    pub const ALL: [TaskState; 3] = [TaskState::Done, TaskState::NotDone, TaskState::DoingRightNow];

    /// Label used in storage and on screen.
    pub fn label(self) -> &'static str {
        match self {
            TaskState::Done => "Done",
            TaskState::NotDone => "Not done",
            TaskState::DoingRightNow => "Doing right now",
        }
    }

    /// Cycle Not done -> Doing right now -> Done -> Not done.
    pub fn next(self) -> Self {
        match self {
            TaskState::NotDone => TaskState::DoingRightNow,
            TaskState::DoingRightNow => TaskState::Done,
            TaskState::Done => TaskState::NotDone,
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Colour scheme for the terminal interface.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}
