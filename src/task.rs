//! Task data structure and related functionality.
//!
//! This module defines the `Task` record exactly as it is persisted, the
//! `TaskId` handle the store hands out for it, and the `TaskDraft` a form or
//! the CLI fills in before the store validates it into a `Task`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::fields::TaskState;

/// Shown wherever a task has no summary (absent or empty).
pub const NO_SUMMARY: &str = "No summary was provided for this task";

/// A single to-do item.
///
/// The serialised shape is `{"title", "summary"?, "state"}`; `summary` is
/// omitted when absent and an empty summary is kept as `""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub state: TaskState,
}

/// Ordered sequence of tasks, as persisted and as rendered.
pub type TaskList = Vec<Task>;

impl Task {
    pub fn new(title: impl Into<String>, summary: Option<String>, state: TaskState) -> Self {
        Task {
            title: title.into(),
            summary,
            state,
        }
    }

    /// Summary text for display, falling back to [`NO_SUMMARY`].
    pub fn display_summary(&self) -> &str {
        match self.summary.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => NO_SUMMARY,
        }
    }

    /// Tasks without a title are kept in storage but never rendered.
    pub fn is_renderable(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

/// Stable handle for a task while it lives in a `TaskStore`.
///
/// Ids are handed out from a counter when a task is created or hydrated and
/// are never reused within a store; they are not written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Unvalidated field values collected by a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub summary: Option<String>,
    pub state: Option<TaskState>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        TaskDraft {
            title: title.into(),
            ..TaskDraft::default()
        }
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn state(mut self, state: TaskState) -> Self {
        self.state = Some(state);
        self
    }

    /// Check required fields and build the task. The title is trimmed; the
    /// summary is kept verbatim.
    pub fn validate(self) -> Result<Task, StoreError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(StoreError::Validation("title is required".into()));
        }
        let state = self
            .state
            .ok_or_else(|| StoreError::Validation("state is required".into()))?;
        Ok(Task::new(title, self.summary, state))
    }
}

impl From<&Task> for TaskDraft {
    fn from(task: &Task) -> Self {
        TaskDraft {
            title: task.title.clone(),
            summary: task.summary.clone(),
            state: Some(task.state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_json_layout() {
        let with_summary = Task::new("Pay bills", Some("Due Friday".into()), TaskState::DoingRightNow);
        assert_eq!(
            serde_json::to_string(&with_summary).unwrap(),
            r#"{"title":"Pay bills","summary":"Due Friday","state":"Doing right now"}"#
        );

        let without = Task::new("Buy milk", None, TaskState::NotDone);
        assert_eq!(
            serde_json::to_string(&without).unwrap(),
            r#"{"title":"Buy milk","state":"Not done"}"#
        );

        let parsed: Task = serde_json::from_str(r#"{"title":"x","state":"Done"}"#).unwrap();
        assert_eq!(parsed.summary, None);
    }

    #[test]
    fn test_display_summary_placeholder() {
        let mut t = Task::new("x", None, TaskState::Done);
        assert_eq!(t.display_summary(), NO_SUMMARY);
        t.summary = Some(String::new());
        assert_eq!(t.display_summary(), NO_SUMMARY);
        t.summary = Some("milk and eggs".into());
        assert_eq!(t.display_summary(), "milk and eggs");
    }

    #[test]
    fn test_draft_validation() {
        let task = TaskDraft::new("  Buy milk ").summary("").state(TaskState::NotDone).validate().unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.summary.as_deref(), Some(""));

        let err = TaskDraft::new("   ").state(TaskState::Done).validate().unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = TaskDraft::new("Buy milk").validate().unwrap_err();
        assert!(matches!(err, StoreError::Validation(ref m) if m.contains("state")));
    }

    #[test]
    fn test_draft_from_task_round_trips() {
        let task = Task::new("Pay bills", Some("Due Friday".into()), TaskState::Done);
        assert_eq!(TaskDraft::from(&task).validate().unwrap(), task);
    }
}
