//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which owns the `TaskStore` for the
//! session, maps key presses onto store operations, and renders the task
//! list together with whichever modal is open.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};
use tracing::warn;

use crate::{
    error::StoreError,
    fields::Theme,
    storage::{load_theme, save_theme, Storage},
    store::TaskStore,
    task::{TaskId, TaskList},
    tui::{
        colors::{palette, state_color, Palette},
        enums::{Modal, Preset},
        task_form::{TaskForm, STATE_FIELD, SUMMARY_FIELD, TITLE_FIELD},
        utils::centered_rect,
    },
};

/// Session state for the terminal user interface.
///
/// UI mode lives here, in `modal`; the store knows nothing about it.
pub struct App<S: Storage> {
    store: TaskStore<S>,
    modal: Modal,
    form: TaskForm,
    /// Ids of the rendered rows, in display order.
    rows: Vec<TaskId>,
    table_state: TableState,
    theme: Theme,
    status_message: String,
}

impl<S: Storage> App<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        let theme = load_theme(store.storage());
        let mut app = App {
            store,
            modal: Modal::Closed,
            form: TaskForm::new(),
            rows: Vec::new(),
            table_state: TableState::default(),
            theme,
            status_message: String::new(),
        };
        app.refresh_rows();
        app
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn modal(&self) -> Modal {
        self.modal
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.table_state
            .selected()
            .and_then(|i| self.rows.get(i))
            .copied()
    }

    /// Rebuild the row list from the store, keeping the selection on the
    /// same task when it is still shown.
    fn refresh_rows(&mut self) {
        let old_id = self.selected_id();
        let old_idx = self.table_state.selected();

        self.rows = self
            .store
            .visible_entries()
            .filter(|e| e.task.is_renderable())
            .map(|e| e.id)
            .collect();

        let selected = match old_id.and_then(|id| self.rows.iter().position(|&r| r == id)) {
            Some(idx) => Some(idx),
            None if self.rows.is_empty() => None,
            None => Some(old_idx.unwrap_or(0).min(self.rows.len() - 1)),
        };
        self.table_state.select(selected);
    }

    fn select_id(&mut self, id: TaskId) {
        if let Some(idx) = self.rows.iter().position(|&r| r == id) {
            self.table_state.select(Some(idx));
        }
    }

    fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let i = self.table_state.selected().map_or(0, |i| (i + 1) % self.rows.len());
        self.table_state.select(Some(i));
    }

    fn select_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let n = self.rows.len();
        let i = self.table_state.selected().map_or(0, |i| (i + n - 1) % n);
        self.table_state.select(Some(i));
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Refresh after a store call, or surface its error. Returns true on success.
    fn report(&mut self, result: Result<TaskList, StoreError>, ok: &str) -> bool {
        match result {
            Ok(_) => {
                self.refresh_rows();
                self.set_status_message(ok);
                true
            }
            Err(e) => {
                warn!("{e}");
                self.set_status_message(format!("Error: {e}"));
                false
            }
        }
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        match save_theme(self.store.storage_mut(), self.theme) {
            Ok(()) => self.set_status_message(format!("Theme: {}", self.theme.label())),
            Err(e) => {
                warn!("could not save colour scheme: {e}");
                self.set_status_message(format!("Error: {e}"));
            }
        }
    }

    fn apply_preset(&mut self, preset: Preset) {
        match preset {
            Preset::SortFirst(state) => {
                let result = self.store.sort_by_state(state);
                self.report(result, &preset.description());
            }
            Preset::ShowOnly(state) => {
                self.store.filter_by_state(state);
                self.refresh_rows();
                self.set_status_message(preset.description());
            }
        }
    }

    /// Handle one key press. Returns true if the application should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        self.status_message.clear();

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return true,
                KeyCode::Char('j') => {
                    self.toggle_theme();
                    return false;
                }
                _ => {}
            }
        }

        match self.modal {
            Modal::Closed => return self.handle_list_key(key.code),
            Modal::Creating | Modal::Editing(_) => self.handle_form_key(key.code),
            Modal::ConfirmDelete(id) => self.handle_confirm_key(key.code, id),
            Modal::Help => self.modal = Modal::Closed,
        }
        false
    }

    fn handle_list_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.select_prev(),
            KeyCode::Char('a') | KeyCode::Char('n') => {
                self.form = TaskForm::new();
                self.modal = Modal::Creating;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_id() {
                    if let Some(task) = self.store.get(id) {
                        self.form = TaskForm::from_task(task);
                        self.modal = Modal::Editing(id);
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.selected_id() {
                    self.modal = Modal::ConfirmDelete(id);
                }
            }
            KeyCode::Char('s') => {
                if let Some(id) = self.selected_id() {
                    if let Some(next) = self.store.get(id).map(|t| t.state.next()) {
                        let result = self.store.update_state_id(id, next);
                        self.report(result, &format!("State: {next}"));
                    }
                }
            }
            KeyCode::Char('0') => {
                self.store.clear_filter();
                self.refresh_rows();
                self.set_status_message("Showing all tasks");
            }
            KeyCode::Char('r') => {
                self.store.reload();
                self.table_state.select(None);
                self.refresh_rows();
                self.set_status_message("Reloaded from disk");
            }
            KeyCode::Char('t') => self.toggle_theme(),
            KeyCode::Char('h') | KeyCode::F(1) => self.modal = Modal::Help,
            KeyCode::Char(c) => {
                if let Some(preset) = Preset::from_key(c) {
                    self.apply_preset(preset);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.modal = Modal::Closed,
            KeyCode::Tab | KeyCode::Down => self.form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.form.prev_field(),
            KeyCode::Left => self.form.handle_left_right(false),
            KeyCode::Right => self.form.handle_left_right(true),
            KeyCode::Home => self.form.handle_home_end(false),
            KeyCode::End => self.form.handle_home_end(true),
            KeyCode::Backspace => self.form.handle_backspace(),
            KeyCode::Delete => self.form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.form.handle_char(c),
            _ => {}
        }
    }

    /// Create or edit from the form. On failure the modal stays open.
    fn submit_form(&mut self) {
        let draft = self.form.to_draft();
        match self.modal {
            Modal::Editing(id) => {
                let result = self.store.edit_id(id, draft);
                if self.report(result, "Task updated") {
                    self.modal = Modal::Closed;
                }
            }
            _ => match self.store.create_entry(draft) {
                Ok(id) => {
                    self.refresh_rows();
                    self.select_id(id);
                    self.modal = Modal::Closed;
                    self.set_status_message("Task created");
                }
                Err(e) => {
                    warn!("{e}");
                    self.set_status_message(format!("Error: {e}"));
                }
            },
        }
    }

    fn handle_confirm_key(&mut self, code: KeyCode, id: TaskId) {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                let result = self.store.delete_id(id);
                self.report(result, "Task deleted");
                self.modal = Modal::Closed;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.modal = Modal::Closed;
            }
            _ => {}
        }
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key));
                }
            }
        }
        Ok(false)
    }

    fn filter_label(&self) -> String {
        match self.store.filter() {
            Some(state) => format!("Showing only \"{}\"", state.label()),
            None => "All tasks".to_string(),
        }
    }

    fn render_header(&self, f: &mut Frame, area: Rect, p: &Palette) {
        let icon = match self.theme {
            Theme::Dark => "☀",
            Theme::Light => "☾",
        };
        let line = Line::from(vec![
            Span::styled("My Tasks", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                self.filter_label(),
                Style::default().fg(p.accent).add_modifier(Modifier::ITALIC),
            ),
            Span::raw("  "),
            Span::styled(format!("{icon} Ctrl+J"), Style::default().fg(p.dimmed)),
        ]);
        let header = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(p.accent)))
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_task_list(&mut self, f: &mut Frame, area: Rect, p: &Palette) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(
                "Tasks ({}/{}) - Press 'h' for help",
                self.rows.len(),
                self.store.entries().len()
            ));

        if self.rows.is_empty() {
            let empty = Paragraph::new("You have no tasks")
                .style(Style::default().fg(p.dimmed))
                .block(block)
                .alignment(Alignment::Center);
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(["#", "State", "Title", "Summary"].map(|h| {
            Cell::from(h).style(Style::default().add_modifier(Modifier::BOLD))
        }))
        .style(Style::default().bg(p.accent).fg(p.bg));

        let rows: Vec<Row> = self
            .rows
            .iter()
            .filter_map(|&id| {
                let task = self.store.get(id)?;
                let position = self.store.position_of(id)? + 1;
                Some(Row::new(vec![
                    Cell::from(position.to_string()),
                    Cell::from(Span::styled(
                        task.state.label(),
                        Style::default().fg(state_color(task.state)),
                    )),
                    Cell::from(Span::styled(
                        task.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Cell::from(Span::styled(
                        task.display_summary().to_string(),
                        Style::default().fg(p.dimmed),
                    )),
                ]))
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Length(16),
            Constraint::Percentage(35),
            Constraint::Min(10),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(p.selection_bg).fg(p.selection_fg))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_form(&self, f: &mut Frame, area: Rect, p: &Palette, is_edit: bool) {
        let area = centered_rect(60, 60, area);
        f.render_widget(Clear, area);

        let block = Block::default()
            .title(if is_edit { "Edit Task" } else { "New Task" })
            .borders(Borders::ALL)
            .border_style(Style::default().fg(p.accent))
            .style(Style::default().bg(p.bg).fg(p.fg));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        let field_style = |focused: bool| {
            if focused {
                Style::default().fg(p.accent)
            } else {
                Style::default().fg(p.dimmed)
            }
        };

        let title = Paragraph::new(self.form.title.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Title *")
                .border_style(field_style(self.form.current_field == TITLE_FIELD)),
        );
        f.render_widget(title, chunks[0]);

        let summary = Paragraph::new(self.form.summary.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Summary")
                .border_style(field_style(self.form.current_field == SUMMARY_FIELD)),
        );
        f.render_widget(summary, chunks[1]);

        let state_style = match self.form.selected_state() {
            Some(s) => Style::default().fg(state_color(s)),
            None => Style::default().fg(p.dimmed),
        };
        let state = Paragraph::new(Line::from(vec![
            Span::raw("◀ "),
            Span::styled(self.form.state_label(), state_style),
            Span::raw(" ▶"),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("State *")
                .border_style(field_style(self.form.current_field == STATE_FIELD)),
        );
        f.render_widget(state, chunks[2]);

        let action = if is_edit { "Edit Task" } else { "Create Task" };
        let hint = Paragraph::new(format!("Enter: {action}   Esc: Cancel   Tab: next field   ←/→: state"))
            .style(Style::default().fg(p.dimmed))
            .alignment(Alignment::Center);
        f.render_widget(hint, chunks[3]);

        let cursor_field = match self.form.current_field {
            TITLE_FIELD => Some((chunks[0], &self.form.title)),
            SUMMARY_FIELD => Some((chunks[1], &self.form.summary)),
            _ => None,
        };
        if let Some((chunk, field)) = cursor_field {
            f.set_cursor_position(input_cursor(chunk, field.cursor));
        }
    }

    fn render_confirm(&self, f: &mut Frame, area: Rect, p: &Palette, id: TaskId) {
        let area = centered_rect(50, 30, area);
        f.render_widget(Clear, area);

        let title = self.store.get(id).map(|t| t.title.as_str()).unwrap_or("");
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "Delete this task?",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(title),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(
                Block::default()
                    .title("Confirm Action")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(p.danger))
                    .style(Style::default().bg(p.bg).fg(p.fg)),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(paragraph, area);
    }

    fn render_help(&self, f: &mut Frame, area: Rect) {
        let heading = |s: &'static str| {
            Line::from(Span::styled(s, Style::default().add_modifier(Modifier::BOLD)))
        };
        let help_text = vec![
            heading("Task List:"),
            Line::from("  ↑/↓, k/j     Move selection"),
            Line::from("  a / n        New task"),
            Line::from("  e / Enter    Edit selected task"),
            Line::from("  d / Del      Delete selected task"),
            Line::from("  s            Cycle state (Not done → Doing right now → Done)"),
            Line::from("  r            Reload from disk"),
            Line::from("  Ctrl+J / t   Toggle light/dark theme"),
            Line::from("  h / F1       Show this help"),
            Line::from("  q / Esc      Quit"),
            Line::from(""),
            heading("Sort and filter:"),
            Line::from("  1  Show \"Done\" first        4  Show only \"Done\""),
            Line::from("  2  Show \"Doing\" first       5  Show only \"Not done\""),
            Line::from("  3  Show \"Not done\" first    6  Show only \"Doing\""),
            Line::from("  0  Show all tasks"),
            Line::from(""),
            heading("Task Form:"),
            Line::from("  Tab, ↑/↓     Move between fields"),
            Line::from("  ←/→          Move cursor, or change state"),
            Line::from("  Home/End     Start/end of text"),
            Line::from("  Enter        Save"),
            Line::from("  Esc          Cancel"),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, f: &mut Frame, area: Rect, p: &Palette) {
        let text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.modal {
                Modal::Closed => format!("Tasks: {} | Press 'h' for help", self.rows.len()),
                Modal::Creating => "New Task".to_string(),
                Modal::Editing(_) => "Edit Task".to_string(),
                Modal::ConfirmDelete(_) => "Confirm Action".to_string(),
                Modal::Help => "Help".to_string(),
            }
        };
        let bar = Paragraph::new(text).style(Style::default().bg(p.accent).fg(p.bg));
        f.render_widget(bar, area);
    }

    /// Draw the whole screen.
    pub fn render(&mut self, f: &mut Frame) {
        let p = palette(self.theme);
        let area = f.area();
        f.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.fg)), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        self.render_header(f, chunks[0], &p);
        match self.modal {
            Modal::Help => self.render_help(f, chunks[1]),
            _ => self.render_task_list(f, chunks[1], &p),
        }
        match self.modal {
            Modal::Creating => self.render_form(f, chunks[1], &p, false),
            Modal::Editing(_) => self.render_form(f, chunks[1], &p, true),
            Modal::ConfirmDelete(id) => self.render_confirm(f, chunks[1], &p, id),
            Modal::Closed | Modal::Help => {}
        }
        self.render_status_bar(f, chunks[2], &p);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

/// Terminal cell for the text cursor of a bordered one-line input. Long
/// values pin it to the last inner column.
fn input_cursor(chunk: Rect, cursor: usize) -> (u16, u16) {
    let last_col = usize::from(chunk.width.saturating_sub(3));
    let offset = u16::try_from(cursor.min(last_col)).unwrap_or(u16::MAX);
    (
        chunk.x.saturating_add(1).saturating_add(offset),
        chunk.y.saturating_add(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::TaskState;
    use crate::storage::MemoryStorage;
    use crate::task::TaskDraft;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App<MemoryStorage>, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App<MemoryStorage>, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_with(tasks: &[(&str, TaskState)]) -> App<MemoryStorage> {
        let mut store = TaskStore::open(MemoryStorage::new());
        for (title, state) in tasks {
            store.create(TaskDraft::new(*title).state(*state)).unwrap();
        }
        App::new(store)
    }

    fn titles(app: &App<MemoryStorage>) -> Vec<String> {
        app.store().visible().into_iter().map(|t| t.title).collect()
    }

    fn screen(app: &mut App<MemoryStorage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_create_task_through_modal() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.modal(), Modal::Creating);

        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "two litres");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.modal(), Modal::Closed);
        assert_eq!(app.status_message(), "Task created");
        let stored = app.store().load();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Buy milk");
        assert_eq!(stored[0].summary.as_deref(), Some("two litres"));
        assert_eq!(stored[0].state, TaskState::NotDone);
    }

    #[test]
    fn test_create_without_state_keeps_modal_open() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "Buy milk");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.modal(), Modal::Creating);
        assert!(app.status_message().contains("state is required"));
        assert!(app.store().load().is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.modal(), Modal::Closed);
    }

    #[test]
    fn test_edit_selected_task() {
        let mut app = app_with(&[("a", TaskState::Done), ("b", TaskState::NotDone)]);
        press(&mut app, KeyCode::Down);
        let id = app.selected_id().unwrap();

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.modal(), Modal::Editing(id));
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "B");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.modal(), Modal::Closed);
        assert_eq!(titles(&app), vec!["a", "B"]);
        assert_eq!(app.store().load()[1].state, TaskState::NotDone);
    }

    #[test]
    fn test_cycle_state_of_selected_task() {
        let mut app = app_with(&[("a", TaskState::NotDone)]);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.store().load()[0].state, TaskState::DoingRightNow);
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.store().load()[0].state, TaskState::Done);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app_with(&[("a", TaskState::Done), ("b", TaskState::NotDone)]);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(titles(&app), vec!["a", "b"]);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(titles(&app), vec!["b"]);
        assert_eq!(app.modal(), Modal::Closed);
        assert!(app.selected_id().is_some());
    }

    #[test]
    fn test_presets_sort_and_filter() {
        let mut app = app_with(&[
            ("a", TaskState::NotDone),
            ("b", TaskState::Done),
            ("c", TaskState::DoingRightNow),
        ]);

        press(&mut app, KeyCode::Char('2'));
        assert_eq!(titles(&app)[0], "c");
        assert_eq!(app.store().load()[0].title, "c");

        press(&mut app, KeyCode::Char('4'));
        assert_eq!(titles(&app), vec!["b"]);
        assert_eq!(app.store().load().len(), 3);

        press(&mut app, KeyCode::Char('0'));
        assert_eq!(titles(&app).len(), 3);
    }

    #[test]
    fn test_theme_toggle_persists() {
        let mut app = app_with(&[]);
        assert_eq!(app.theme(), Theme::Light);

        app.handle_key(KeyEvent::new(KeyCode::Char('j'), KeyModifiers::CONTROL));

        assert_eq!(app.theme(), Theme::Dark);
        assert_eq!(load_theme(app.store().storage()), Theme::Dark);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(&[]);
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(press(&mut app, KeyCode::Char('q')));

        press(&mut app, KeyCode::Char('a'));
        assert!(!press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn test_untitled_tasks_are_not_rendered() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                crate::storage::TASKS_KEY,
                r#"[{"title":"","state":"Done"},{"title":"visible","state":"Done"}]"#,
            )
            .unwrap();
        let mut app = App::new(TaskStore::open(storage));

        assert_eq!(app.rows.len(), 1);
        let text = screen(&mut app);
        assert!(text.contains("visible"));
        assert!(text.contains("Tasks (1/2)"));
    }

    #[test]
    fn test_render_empty_and_populated() {
        let mut app = app_with(&[]);
        assert!(screen(&mut app).contains("You have no tasks"));

        let mut app = app_with(&[("Pay bills", TaskState::DoingRightNow)]);
        let text = screen(&mut app);
        assert!(text.contains("Pay bills"));
        assert!(text.contains("Doing right now"));
        assert!(text.contains("No summary was"));

        press(&mut app, KeyCode::Char('a'));
        assert!(screen(&mut app).contains("New Task"));
    }

    #[test]
    fn test_input_cursor_stays_inside_box() {
        let chunk = Rect::new(10, 5, 20, 3);
        assert_eq!(input_cursor(chunk, 0), (11, 6));
        assert_eq!(input_cursor(chunk, 4), (15, 6));
        assert_eq!(input_cursor(chunk, 100_000), (28, 6));
        let far_right = Rect {
            x: u16::MAX - 2,
            y: 0,
            width: 20,
            height: 3,
        };
        assert_eq!(input_cursor(far_right, 7), (u16::MAX, 1));
    }

    #[test]
    fn test_long_title_renders_with_cursor_in_form() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, &"x".repeat(300));
        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Char('>'));
        press(&mut app, KeyCode::End);
        press(&mut app, KeyCode::Char('<'));

        assert!(screen(&mut app).contains("New Task"));
        assert_eq!(app.form.title.value.chars().count(), 302);
        assert!(app.form.title.value.starts_with('>'));
        assert!(app.form.title.value.ends_with('<'));
    }
}
