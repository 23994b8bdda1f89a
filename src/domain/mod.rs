pub mod enums;
pub mod settings;
pub mod state;
pub mod task;
pub mod views;

pub use enums::{GroupColor, PomodoroPhase, SortBy, Theme, UiMode};
pub use settings::{AppSettings, PomodoroSettings, SettingsPatch, MAX_DURATION_MINUTES};
pub use state::AppState;
pub use task::{now_millis, GroupPatch, HistoryEntry, Task, TaskGroup, TaskPatch};
pub use views::{
    active_tasks, completed_tasks, flatten_rows, grouped_active_tasks, groups_in_order, move_task,
    sort_tasks, FlatRow, Section,
};
