use super::settings::AppSettings;
use super::task::{now_millis, HistoryEntry, Task, TaskGroup};
use serde::{Deserialize, Serialize};

/// The aggregate persisted as one blob
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub groups: Vec<TaskGroup>,
    /// Completion log, most recent first
    pub history: Vec<HistoryEntry>,
    pub settings: AppSettings,
    pub last_updated: i64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            tasks: Vec::new(),
            groups: Vec::new(),
            history: Vec::new(),
            settings: AppSettings::default(),
            last_updated: now_millis(),
        }
    }
}

impl AppState {
    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn find_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn find_group(&self, id: &str) -> Option<&TaskGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn find_group_mut(&mut self, id: &str) -> Option<&mut TaskGroup> {
        self.groups.iter_mut().find(|g| g.id == id)
    }
}
