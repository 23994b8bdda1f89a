use super::enums::GroupColor;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Current wall-clock time as epoch milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Fresh opaque identifier
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// Manual ordering key; compared relatively, may have gaps or repeats
    #[serde(default)]
    pub order: i64,
}

impl Task {
    pub fn new(title: String, description: Option<String>, group_id: Option<String>, order: i64) -> Self {
        Self {
            id: new_id(),
            title,
            description,
            completed: false,
            created_at: now_millis(),
            completed_at: None,
            group_id,
            order,
        }
    }

    /// Mark completed at the given instant
    pub fn mark_completed(&mut self, at: i64) {
        self.completed = true;
        self.completed_at = Some(at);
    }

    /// Merge a partial update into this task
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(completed_at) = patch.completed_at {
            self.completed_at = completed_at;
        }
        if let Some(group_id) = patch.group_id {
            self.group_id = group_id;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }

    /// Case-insensitive substring match on the title
    pub fn title_contains(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Fields of a task that may be updated in place.
///
/// The outer `Option` means "leave unchanged"; for nullable fields the inner
/// `Option` is the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub completed: Option<bool>,
    pub completed_at: Option<Option<i64>>,
    pub group_id: Option<Option<String>>,
    pub order: Option<i64>,
}

/// A named collection tasks may belong to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskGroup {
    pub id: String,
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_color"
    )]
    pub color: Option<GroupColor>,
    #[serde(default = "default_expanded")]
    pub expanded: bool,
    #[serde(default)]
    pub order: i64,
    pub created_at: i64,
}

fn default_expanded() -> bool {
    true
}

/// Unknown palette names read as "no color" instead of failing the whole blob
fn lenient_color<'de, D>(deserializer: D) -> Result<Option<GroupColor>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(GroupColor::from_name))
}

impl TaskGroup {
    pub fn new(name: String, color: Option<GroupColor>, order: i64) -> Self {
        Self {
            id: new_id(),
            name,
            color,
            expanded: true,
            order,
            created_at: now_millis(),
        }
    }

    pub fn apply(&mut self, patch: GroupPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(expanded) = patch.expanded {
            self.expanded = expanded;
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
    }
}

/// Fields of a group that may be updated in place
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupPatch {
    pub name: Option<String>,
    pub color: Option<Option<GroupColor>>,
    pub expanded: Option<bool>,
    pub order: Option<i64>,
}

/// Immutable record of one task completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub task_title: String,
    pub completed_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_name: Option<String>,
}

impl HistoryEntry {
    pub fn new(task_title: String, completed_at: i64, group_name: Option<String>) -> Self {
        Self {
            id: new_id(),
            task_title,
            completed_at,
            group_name,
        }
    }
}
