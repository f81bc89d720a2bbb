//! Task form handling for the terminal user interface.
//!
//! The same form backs both the "New Task" and "Edit Task" modals: two text
//! inputs and a state selector whose first entry is an unset placeholder.

use crate::{
    fields::TaskState,
    task::{Task, TaskDraft},
    tui::input::InputField,
};

/// Field order in the modal.
pub const TITLE_FIELD: usize = 0;
pub const SUMMARY_FIELD: usize = 1;
pub const STATE_FIELD: usize = 2;
const FIELD_COUNT: usize = 3;

/// Label of the unset state entry.
pub const STATE_PLACEHOLDER: &str = "Select state";

pub struct TaskForm {
    pub title: InputField,
    pub summary: InputField,
    pub state: usize,
    pub current_field: usize,
    pub states: Vec<Option<TaskState>>,
}

impl TaskForm {
    /// Empty form with no state selected.
    pub fn new() -> Self {
        let mut form = Self {
            title: InputField::new(),
            summary: InputField::new(),
            state: 0,
            current_field: TITLE_FIELD,
            states: std::iter::once(None)
                .chain(TaskState::ALL.into_iter().map(Some))
                .collect(),
        };
        form.update_active_field();
        form
    }

    /// Form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new();
        form.title = InputField::with_value(&task.title);
        form.summary = InputField::with_value(task.summary.as_deref().unwrap_or_default());
        form.state = form
            .states
            .iter()
            .position(|&s| s == Some(task.state))
            .unwrap_or(0);
        form.update_active_field();
        form
    }

    pub fn selected_state(&self) -> Option<TaskState> {
        self.states.get(self.state).copied().flatten()
    }

    pub fn state_label(&self) -> &'static str {
        self.selected_state().map_or(STATE_PLACEHOLDER, TaskState::label)
    }

    /// Field values as an unvalidated draft; the store decides what is valid.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.value.clone(),
            summary: Some(self.summary.value.clone()),
            state: self.selected_state(),
        }
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Mark only the focused text input as active.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.summary.active = self.current_field == SUMMARY_FIELD;
    }

    fn focused_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            SUMMARY_FIELD => Some(&mut self.summary),
            _ => None,
        }
    }

    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.focused_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.focused_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.focused_input() {
            field.handle_delete();
        }
    }

    /// Move the cursor in a text input, or cycle the state selector.
    pub fn handle_left_right(&mut self, right: bool) {
        if self.current_field == STATE_FIELD {
            let n = self.states.len();
            self.state = if right {
                (self.state + 1) % n
            } else {
                (self.state + n - 1) % n
            };
        } else if let Some(field) = self.focused_input() {
            if right {
                field.move_cursor_right();
            } else {
                field.move_cursor_left();
            }
        }
    }

    /// Jump to the start or end of the focused text input.
    pub fn handle_home_end(&mut self, end: bool) {
        if let Some(field) = self.focused_input() {
            if end {
                field.move_end();
            } else {
                field.move_home();
            }
        }
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}
