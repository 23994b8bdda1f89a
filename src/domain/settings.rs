use super::enums::{SortBy, Theme};
use serde::{Deserialize, Serialize};

/// Longest accepted phase length in minutes (one day)
pub const MAX_DURATION_MINUTES: u32 = 1440;

fn minutes_to_secs(minutes: u32) -> u32 {
    minutes.min(MAX_DURATION_MINUTES).saturating_mul(60)
}

/// Pomodoro timer configuration (durations in minutes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PomodoroSettings {
    pub work_duration: u32,
    pub short_break: u32,
    pub long_break: u32,
    /// Work sessions completed before a long break
    pub long_break_interval: u32,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
    pub notifications_enabled: bool,
}

impl Default for PomodoroSettings {
    fn default() -> Self {
        Self {
            work_duration: 25,
            short_break: 5,
            long_break: 15,
            long_break_interval: 4,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
            notifications_enabled: true,
        }
    }
}

impl PomodoroSettings {
    pub fn work_secs(&self) -> u32 {
        minutes_to_secs(self.work_duration)
    }

    pub fn short_break_secs(&self) -> u32 {
        minutes_to_secs(self.short_break)
    }

    pub fn long_break_secs(&self) -> u32 {
        minutes_to_secs(self.long_break)
    }

    /// Bring stored values into range: durations to `1..=MAX_DURATION_MINUTES`,
    /// interval to at least 1
    pub fn clamped(self) -> Self {
        Self {
            work_duration: self.work_duration.clamp(1, MAX_DURATION_MINUTES),
            short_break: self.short_break.clamp(1, MAX_DURATION_MINUTES),
            long_break: self.long_break.clamp(1, MAX_DURATION_MINUTES),
            long_break_interval: self.long_break_interval.max(1),
            ..self
        }
    }
}

/// User preferences persisted alongside the task data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    /// Speech/intent API credential; empty means unset
    #[serde(rename = "openAIApiKey")]
    pub open_ai_api_key: String,
    pub pomodoro: PomodoroSettings,
    pub sort_by: SortBy,
    pub theme: Theme,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            open_ai_api_key: String::new(),
            pomodoro: PomodoroSettings::default(),
            sort_by: SortBy::Manual,
            theme: Theme::Light,
        }
    }
}

impl AppSettings {
    pub fn has_api_key(&self) -> bool {
        !self.open_ai_api_key.trim().is_empty()
    }

    /// Shallow merge: each present top-level field replaces the current one.
    /// `pomodoro` is a complete record and is swapped in wholesale.
    pub fn apply(&mut self, patch: SettingsPatch) {
        if let Some(key) = patch.open_ai_api_key {
            self.open_ai_api_key = key;
        }
        if let Some(pomodoro) = patch.pomodoro {
            self.pomodoro = pomodoro;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
    }
}

/// Partial settings update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsPatch {
    pub open_ai_api_key: Option<String>,
    pub pomodoro: Option<PomodoroSettings>,
    pub sort_by: Option<SortBy>,
    pub theme: Option<Theme>,
}
