//! The task list and its persisted mirror.
//!
//! `TaskStore` owns the authoritative, ordered list of tasks and is the only
//! writer of the `tasks` slot. Every mutation builds the new list, writes it
//! to storage and only then replaces the in-memory copy, so a failed write
//! leaves the store exactly as it was.
//!
//! Tasks are addressed by [`TaskId`]. The index-based operations are a
//! convenience for presentation code: an index is a position in the
//! *visible* list (the stored list seen through the current filter) and is
//! resolved to an id at call time.

use tracing::{debug, info, warn};

use crate::error::{Result, StoreError};
use crate::fields::TaskState;
use crate::storage::{Storage, TASKS_KEY};
use crate::task::{Task, TaskDraft, TaskId, TaskList};

/// A stored task together with its stable id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: TaskId,
    pub task: Task,
}

pub struct TaskStore<S: Storage> {
    storage: S,
    entries: Vec<Entry>,
    filter: Option<TaskState>,
    next_id: u64,
}

impl<S: Storage> TaskStore<S> {
    /// Open a store and hydrate it from the `tasks` slot.
    pub fn open(storage: S) -> Self {
        let mut store = TaskStore {
            storage,
            entries: Vec::new(),
            filter: None,
            next_id: 1,
        };
        store.reload();
        store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// All stored entries, ignoring the filter.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The full stored list, ignoring the filter.
    pub fn tasks(&self) -> TaskList {
        self.entries.iter().map(|e| e.task.clone()).collect()
    }

    /// The state currently used to filter the visible list, if any.
    pub fn filter(&self) -> Option<TaskState> {
        self.filter
    }

    /// Entries that pass the current filter, in stored order.
    pub fn visible_entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        let filter = self.filter;
        self.entries
            .iter()
            .filter(move |e| filter.map_or(true, |s| e.task.state == s))
    }

    /// The list presentation code should render.
    pub fn visible(&self) -> TaskList {
        self.visible_entries().map(|e| e.task.clone()).collect()
    }

    pub fn visible_len(&self) -> usize {
        self.visible_entries().count()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.task)
    }

    /// Id of the task at `index` in the visible list.
    pub fn id_at(&self, index: usize) -> Result<TaskId> {
        self.visible_entries()
            .nth(index)
            .map(|e| e.id)
            .ok_or_else(|| StoreError::Index {
                index,
                len: self.visible_len(),
            })
    }

    /// Position of `id` in the visible list, if it is visible.
    pub fn position_of(&self, id: TaskId) -> Option<usize> {
        self.visible_entries().position(|e| e.id == id)
    }

    /// Validate `draft` and append it to the end of the stored list.
    pub fn create(&mut self, draft: TaskDraft) -> Result<TaskList> {
        self.create_entry(draft).map(|_| self.visible())
    }

    /// Like [`create`](Self::create) but hands back the new task's id.
    pub fn create_entry(&mut self, draft: TaskDraft) -> Result<TaskId> {
        let task = draft.validate()?;
        let id = TaskId(self.next_id);
        let mut entries = self.entries.clone();
        entries.push(Entry { id, task });
        self.commit(entries)?;
        self.next_id += 1;
        info!(%id, "created task");
        Ok(id)
    }

    pub fn delete(&mut self, index: usize) -> Result<TaskList> {
        let id = self.id_at(index)?;
        self.delete_id(id)
    }

    pub fn delete_id(&mut self, id: TaskId) -> Result<TaskList> {
        let pos = self.stored_position(id)?;
        let mut entries = self.entries.clone();
        entries.remove(pos);
        self.commit(entries)?;
        info!(%id, "deleted task");
        Ok(self.visible())
    }

    /// Replace the task at `index` wholesale with the draft's fields.
    pub fn edit(&mut self, index: usize, draft: TaskDraft) -> Result<TaskList> {
        let id = self.id_at(index)?;
        self.edit_id(id, draft)
    }

    pub fn edit_id(&mut self, id: TaskId, draft: TaskDraft) -> Result<TaskList> {
        let pos = self.stored_position(id)?;
        let task = draft.validate()?;
        let mut entries = self.entries.clone();
        entries[pos].task = task;
        self.commit(entries)?;
        info!(%id, "edited task");
        Ok(self.visible())
    }

    /// Change only the state of the task at `index`.
    pub fn update_state(&mut self, index: usize, state: TaskState) -> Result<TaskList> {
        let id = self.id_at(index)?;
        self.update_state_id(id, state)
    }

    pub fn update_state_id(&mut self, id: TaskId, state: TaskState) -> Result<TaskList> {
        let pos = self.stored_position(id)?;
        let mut entries = self.entries.clone();
        entries[pos].task.state = state;
        self.commit(entries)?;
        info!(%id, %state, "updated task state");
        Ok(self.visible())
    }

    /// Move every task in `target` state ahead of every other task.
    ///
    /// Membership in `target` is the only ordering key; the reorder is a
    /// stable partition. The new order is persisted.
    pub fn sort_by_state(&mut self, target: TaskState) -> Result<TaskList> {
        let mut entries = self.entries.clone();
        entries.sort_by_key(|e| e.task.state != target);
        self.commit(entries)?;
        info!(%target, "sorted tasks");
        Ok(self.visible())
    }

    /// Show only tasks in `target` state. Nothing is discarded or persisted;
    /// later mutations still act on the full list.
    pub fn filter_by_state(&mut self, target: TaskState) -> TaskList {
        self.filter = Some(target);
        debug!(%target, "filter set");
        self.visible()
    }

    pub fn clear_filter(&mut self) -> TaskList {
        self.filter = None;
        self.visible()
    }

    /// Write the full stored list to the `tasks` slot.
    pub fn save(&mut self) -> Result<()> {
        let tasks = self.tasks();
        save_tasks(&mut self.storage, &tasks)
    }

    /// Read the `tasks` slot without touching the in-memory list.
    pub fn load(&self) -> TaskList {
        load_tasks(&self.storage)
    }

    /// Rehydrate from storage and drop the filter. Every task gets a fresh id.
    pub fn reload(&mut self) {
        let tasks = self.load();
        let mut next_id = self.next_id;
        self.entries = tasks
            .into_iter()
            .map(|task| {
                let id = TaskId(next_id);
                next_id += 1;
                Entry { id, task }
            })
            .collect();
        self.next_id = next_id;
        self.filter = None;
        debug!(count = self.entries.len(), "hydrated task list");
    }

    fn stored_position(&self, id: TaskId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn commit(&mut self, entries: Vec<Entry>) -> Result<()> {
        let tasks: TaskList = entries.iter().map(|e| e.task.clone()).collect();
        save_tasks(&mut self.storage, &tasks)?;
        self.entries = entries;
        Ok(())
    }
}

/// Serialise `tasks` into the `tasks` slot, replacing whatever was there.
pub fn save_tasks<S: Storage + ?Sized>(storage: &mut S, tasks: &[Task]) -> Result<()> {
    let data = serde_json::to_string_pretty(tasks)?;
    storage.set(TASKS_KEY, &data)
}

/// Read the `tasks` slot. Never fails: a missing, unreadable or malformed
/// slot reads as an empty list, and individual entries that do not have the
/// task shape are skipped.
pub fn load_tasks<S: Storage + ?Sized>(storage: &S) -> TaskList {
    match storage.get(TASKS_KEY) {
        Ok(Some(raw)) => parse_tasks(&raw),
        Ok(None) => TaskList::new(),
        Err(e) => {
            warn!("could not read task list, starting empty: {e}");
            TaskList::new()
        }
    }
}

fn parse_tasks(raw: &str) -> TaskList {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            warn!("task list is not a JSON array, starting empty: {e}");
            return TaskList::new();
        }
    };
    values
        .into_iter()
        .enumerate()
        .filter_map(|(i, value)| match serde_json::from_value::<Task>(value) {
            Ok(task) => Some(task),
            Err(e) => {
                warn!("skipping malformed task at position {i}: {e}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    /// Storage whose writes can be made to fail.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: bool,
    }

    impl Storage for FlakyStorage {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if self.fail_writes {
                return Err(StoreError::Persistence("disk full".into()));
            }
            self.inner.set(key, value)
        }
    }

    fn draft(title: &str, summary: &str, state: TaskState) -> TaskDraft {
        TaskDraft::new(title).summary(summary).state(state)
    }

    fn titles(list: &[Task]) -> Vec<&str> {
        list.iter().map(|t| t.title.as_str()).collect()
    }

    fn store_with(tasks: &[(&str, TaskState)]) -> TaskStore<MemoryStorage> {
        let mut store = TaskStore::open(MemoryStorage::new());
        for (title, state) in tasks {
            store.create(draft(title, "", *state)).unwrap();
        }
        store
    }

    #[test]
    fn test_walkthrough_scenario() {
        let mut store = TaskStore::open(MemoryStorage::new());
        assert!(store.visible().is_empty());

        let list = store.create(draft("Buy milk", "", TaskState::NotDone)).unwrap();
        assert_eq!(list, vec![Task::new("Buy milk", Some(String::new()), TaskState::NotDone)]);

        let list = store
            .create(draft("Pay bills", "Due Friday", TaskState::DoingRightNow))
            .unwrap();
        assert_eq!(list.len(), 2);

        let list = store.sort_by_state(TaskState::DoingRightNow).unwrap();
        assert_eq!(titles(&list), vec!["Pay bills", "Buy milk"]);

        let list = store.delete(0).unwrap();
        assert_eq!(titles(&list), vec!["Buy milk"]);

        let list = store.update_state(0, TaskState::Done).unwrap();
        assert_eq!(list, vec![Task::new("Buy milk", Some(String::new()), TaskState::Done)]);
        assert_eq!(store.load(), list);
    }

    #[test]
    fn test_create_appends_and_persists() {
        let mut store = store_with(&[("a", TaskState::Done), ("b", TaskState::NotDone)]);
        let before = store.visible().len();

        let list = store.create(draft("c", "third", TaskState::DoingRightNow)).unwrap();

        assert_eq!(list.len(), before + 1);
        assert_eq!(list.last().unwrap().title, "c");
        assert_eq!(store.load(), list);
    }

    #[test]
    fn test_create_rejects_missing_fields() {
        let mut store = store_with(&[("a", TaskState::Done)]);

        let err = store.create(draft("  ", "x", TaskState::Done)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store.create(TaskDraft::new("no state")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        assert_eq!(titles(&store.load()), vec!["a"]);
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let mut store = store_with(&[
            ("a", TaskState::Done),
            ("b", TaskState::NotDone),
            ("c", TaskState::DoingRightNow),
        ]);
        store
            .edit(1, TaskDraft::new("b2").state(TaskState::Done))
            .unwrap();
        store.save().unwrap();

        let reopened = TaskStore::open(store.storage().clone());
        assert_eq!(reopened.tasks(), store.tasks());
        assert_eq!(reopened.tasks()[1].summary, None);
    }

    #[test]
    fn test_delete_keeps_relative_order() {
        let mut store = store_with(&[
            ("a", TaskState::Done),
            ("b", TaskState::NotDone),
            ("c", TaskState::Done),
            ("d", TaskState::NotDone),
        ]);

        let list = store.delete(1).unwrap();

        assert_eq!(titles(&list), vec!["a", "c", "d"]);
        assert_eq!(store.load(), list);
    }

    #[test]
    fn test_out_of_bounds_index_is_rejected() {
        let mut store = store_with(&[("a", TaskState::Done)]);

        assert!(matches!(store.delete(1), Err(StoreError::Index { index: 1, len: 1 })));
        assert!(matches!(
            store.edit(5, draft("x", "", TaskState::Done)),
            Err(StoreError::Index { index: 5, len: 1 })
        ));
        assert!(matches!(
            store.update_state(1, TaskState::NotDone),
            Err(StoreError::Index { .. })
        ));
        assert_eq!(store.visible().len(), 1);
    }

    #[test]
    fn test_edit_replaces_task_in_place() {
        let mut store = store_with(&[("a", TaskState::Done), ("b", TaskState::NotDone)]);
        let id = store.id_at(1).unwrap();

        let list = store
            .edit(1, TaskDraft::new("b!").state(TaskState::DoingRightNow))
            .unwrap();

        assert_eq!(list[1], Task::new("b!", None, TaskState::DoingRightNow));
        assert_eq!(store.id_at(1).unwrap(), id);

        let err = store.edit(0, TaskDraft::new("").state(TaskState::Done)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.visible()[0].title, "a");
    }

    #[test]
    fn test_sort_partitions_on_target_state() {
        let mut store = store_with(&[
            ("a", TaskState::NotDone),
            ("b", TaskState::Done),
            ("c", TaskState::DoingRightNow),
            ("d", TaskState::Done),
            ("e", TaskState::NotDone),
        ]);

        let list = store.sort_by_state(TaskState::Done).unwrap();

        let done = list.iter().filter(|t| t.state == TaskState::Done).count();
        assert_eq!(done, 2);
        assert!(list[..done].iter().all(|t| t.state == TaskState::Done));
        assert!(list[done..].iter().all(|t| t.state != TaskState::Done));
        assert_eq!(list.len(), 5);
        assert_eq!(store.load(), list);
    }

    #[test]
    fn test_sort_with_no_matches_keeps_every_task() {
        let mut store = store_with(&[("a", TaskState::NotDone), ("b", TaskState::NotDone)]);
        let list = store.sort_by_state(TaskState::Done).unwrap();
        let mut got = titles(&list);
        got.sort();
        assert_eq!(got, vec!["a", "b"]);
    }

    #[test]
    fn test_filter_is_a_view() {
        let mut store = store_with(&[
            ("a", TaskState::Done),
            ("b", TaskState::NotDone),
            ("c", TaskState::Done),
        ]);

        let list = store.filter_by_state(TaskState::Done);
        assert_eq!(titles(&list), vec!["a", "c"]);
        assert_eq!(store.tasks().len(), 3);
        assert_eq!(store.load().len(), 3);

        // Creating while filtered keeps the hidden task in storage.
        let list = store.create(draft("d", "", TaskState::NotDone)).unwrap();
        assert_eq!(titles(&list), vec!["a", "c"]);
        assert_eq!(titles(&store.load()), vec!["a", "b", "c", "d"]);

        assert_eq!(store.clear_filter().len(), 4);
    }

    #[test]
    fn test_index_is_relative_to_visible_list() {
        let mut store = store_with(&[
            ("a", TaskState::Done),
            ("b", TaskState::NotDone),
            ("c", TaskState::Done),
        ]);
        store.filter_by_state(TaskState::Done);

        let list = store.delete(1).unwrap();

        assert_eq!(titles(&list), vec!["a"]);
        assert_eq!(titles(&store.tasks()), vec!["a", "b"]);
    }

    #[test]
    fn test_reload_restores_unfiltered_list() {
        let mut store = store_with(&[("a", TaskState::Done), ("b", TaskState::NotDone)]);
        store.filter_by_state(TaskState::NotDone);

        store.reload();

        assert_eq!(store.filter(), None);
        assert_eq!(titles(&store.visible()), vec!["a", "b"]);
    }

    #[test]
    fn test_ids_survive_deletes() {
        let mut store = store_with(&[
            ("a", TaskState::Done),
            ("b", TaskState::NotDone),
            ("c", TaskState::Done),
        ]);
        let c = store.id_at(2).unwrap();

        store.delete(0).unwrap();

        assert_eq!(store.position_of(c), Some(1));
        assert_eq!(store.get(c).unwrap().title, "c");
        store.update_state_id(c, TaskState::NotDone).unwrap();
        assert_eq!(store.visible()[1].state, TaskState::NotDone);

        let a_was = TaskId(1);
        assert!(matches!(store.delete_id(a_was), Err(StoreError::NotFound(id)) if id == a_was));
    }

    #[test]
    fn test_new_ids_are_never_reused() {
        let mut store = store_with(&[("a", TaskState::Done)]);
        let first = store.id_at(0).unwrap();
        store.delete(0).unwrap();
        let second = store.create_entry(draft("b", "", TaskState::Done)).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_load_is_idempotent() {
        let store = store_with(&[("a", TaskState::Done), ("b", TaskState::NotDone)]);
        assert_eq!(store.load(), store.load());
    }

    #[test]
    fn test_load_fails_closed() {
        let mut storage = MemoryStorage::new();
        assert!(load_tasks(&storage).is_empty());

        storage.set(TASKS_KEY, "not json").unwrap();
        assert!(load_tasks(&storage).is_empty());

        storage.set(TASKS_KEY, "null").unwrap();
        assert!(load_tasks(&storage).is_empty());

        storage.set(TASKS_KEY, r#"{"title":"a","state":"Done"}"#).unwrap();
        assert!(load_tasks(&storage).is_empty());
    }

    #[test]
    fn test_load_skips_malformed_entries() {
        let mut storage = MemoryStorage::new();
        storage
            .set(
                TASKS_KEY,
                r#"[
                    {"title":"ok","state":"Done"},
                    {"title":"bad state","state":"Someday"},
                    42,
                    {"title":"","summary":"hidden","state":"Not done"}
                ]"#,
            )
            .unwrap();

        let store = TaskStore::open(storage);

        assert_eq!(titles(&store.visible()), vec!["ok", ""]);
        assert!(!store.visible()[1].is_renderable());
    }

    #[test]
    fn test_failed_write_leaves_store_untouched() {
        let mut store = TaskStore::open(FlakyStorage::default());
        store.create(draft("a", "", TaskState::NotDone)).unwrap();
        store.create(draft("b", "", TaskState::Done)).unwrap();
        store.storage_mut().fail_writes = true;

        let err = store.create(draft("c", "", TaskState::Done)).unwrap_err();
        assert!(err.is_persistence());
        assert!(store.delete(0).unwrap_err().is_persistence());
        assert!(store.sort_by_state(TaskState::Done).unwrap_err().is_persistence());
        assert!(store.update_state(0, TaskState::Done).unwrap_err().is_persistence());

        assert_eq!(titles(&store.visible()), vec!["a", "b"]);
        assert_eq!(store.visible()[0].state, TaskState::NotDone);

        store.storage_mut().fail_writes = false;
        let id = store.create_entry(draft("c", "", TaskState::Done)).unwrap();
        assert_eq!(store.position_of(id), Some(2));
    }
}
