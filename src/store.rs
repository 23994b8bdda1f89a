//! Owner of the persisted application state.
//!
//! Every mutation follows the same contract: change the in-memory
//! [`AppState`], then write the whole aggregate through the storage port.
//! Writes happen synchronously on the caller's thread, so two writes from one
//! store can never interleave. Persistence failures are logged by
//! [`save_state`] and never roll back the in-memory change.

use crate::domain::{
    now_millis, AppSettings, AppState, GroupColor, GroupPatch, HistoryEntry, SettingsPatch, Task,
    TaskGroup, TaskPatch,
};
use crate::persistence::{load_state, save_state, StateStorage};
use tracing::debug;

pub struct TaskStore {
    state: AppState,
    storage: Box<dyn StateStorage>,
}

impl TaskStore {
    /// Load from storage (defaults on any failure) and take ownership
    pub fn open(storage: Box<dyn StateStorage>) -> Self {
        let state = load_state(storage.as_ref());
        Self { state, storage }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.state.tasks
    }

    pub fn groups(&self) -> &[TaskGroup] {
        &self.state.groups
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.history
    }

    pub fn settings(&self) -> &AppSettings {
        &self.state.settings
    }

    fn persist(&self) {
        save_state(self.storage.as_ref(), &self.state);
    }

    /// Append a new open task. Blank titles are ignored.
    pub fn add_task(&mut self, title: &str, description: Option<&str>, group_id: Option<&str>) -> Option<String> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }

        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let order = self.state.tasks.len() as i64;
        let task = Task::new(title.to_string(), description, group_id.map(str::to_string), order);
        let id = task.id.clone();

        debug!(task_id = %id, "adding task");
        self.state.tasks.push(task);
        self.persist();
        Some(id)
    }

    pub fn update_task(&mut self, id: &str, patch: TaskPatch) {
        let Some(task) = self.state.find_task_mut(id) else {
            return;
        };
        task.apply(patch);
        self.persist();
    }

    /// Mark a task done and prepend a history entry.
    ///
    /// Completing an already-completed task re-stamps `completedAt` and logs
    /// another entry.
    pub fn complete_task(&mut self, id: &str) {
        let Some(task) = self.state.find_task(id) else {
            return;
        };

        let group_name = task
            .group_id
            .as_deref()
            .and_then(|gid| self.state.find_group(gid))
            .map(|g| g.name.clone());
        let now = now_millis();
        let entry = HistoryEntry::new(task.title.clone(), now, group_name);

        if let Some(task) = self.state.find_task_mut(id) {
            task.mark_completed(now);
        }
        debug!(task_id = %id, "completing task");
        self.state.history.insert(0, entry);
        self.persist();
    }

    /// Remove a task. History already recorded for it is kept.
    pub fn delete_task(&mut self, id: &str) {
        let before = self.state.tasks.len();
        self.state.tasks.retain(|t| t.id != id);
        if self.state.tasks.len() == before {
            return;
        }
        debug!(task_id = %id, "deleted task");
        self.persist();
    }

    /// Replace the whole task sequence with the caller's.
    pub fn reorder_tasks(&mut self, tasks: Vec<Task>) {
        self.state.tasks = tasks;
        self.persist();
    }

    /// Append a new expanded group. Blank names are ignored.
    pub fn add_group(&mut self, name: &str, color: Option<GroupColor>) -> Option<String> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let order = self.state.groups.len() as i64;
        let group = TaskGroup::new(name.to_string(), color, order);
        let id = group.id.clone();

        debug!(group_id = %id, "adding group");
        self.state.groups.push(group);
        self.persist();
        Some(id)
    }

    pub fn update_group(&mut self, id: &str, patch: GroupPatch) {
        let Some(group) = self.state.find_group_mut(id) else {
            return;
        };
        group.apply(patch);
        self.persist();
    }

    pub fn toggle_group_expanded(&mut self, id: &str) {
        let Some(group) = self.state.find_group_mut(id) else {
            return;
        };
        group.expanded = !group.expanded;
        self.persist();
    }

    /// Remove a group; its member tasks survive ungrouped.
    pub fn delete_group(&mut self, id: &str) {
        let before = self.state.groups.len();
        self.state.groups.retain(|g| g.id != id);
        if self.state.groups.len() == before {
            return;
        }

        for task in &mut self.state.tasks {
            if task.group_id.as_deref() == Some(id) {
                task.group_id = None;
            }
        }
        debug!(group_id = %id, "deleted group");
        self.persist();
    }

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.state.settings.apply(patch);
        self.persist();
    }

    pub fn clear_history(&mut self) {
        self.state.history.clear();
        self.persist();
    }
}
