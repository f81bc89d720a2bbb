//! Enumerations for TUI state management.

use crate::fields::TaskState;
use crate::task::TaskId;

/// What is drawn over the task list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Modal {
    Closed,
    Creating,
    Editing(TaskId),
    ConfirmDelete(TaskId),
    Help,
}

/// The six preset list actions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Preset {
    SortFirst(TaskState),
    ShowOnly(TaskState),
}

impl Preset {
    /// Key binding for a preset, in the order the help screen lists them.
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '1' => Some(Preset::SortFirst(TaskState::Done)),
            '2' => Some(Preset::SortFirst(TaskState::DoingRightNow)),
            '3' => Some(Preset::SortFirst(TaskState::NotDone)),
            '4' => Some(Preset::ShowOnly(TaskState::Done)),
            '5' => Some(Preset::ShowOnly(TaskState::NotDone)),
            '6' => Some(Preset::ShowOnly(TaskState::DoingRightNow)),
            _ => None,
        }
    }

    pub fn description(self) -> String {
        match self {
            Preset::SortFirst(s) => format!("Showing \"{}\" first", s.label()),
            Preset::ShowOnly(s) => format!("Showing only \"{}\"", s.label()),
        }
    }
}
