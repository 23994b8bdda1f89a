use serde::{Deserialize, Serialize};

/// Read-time ordering applied to task lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortBy {
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "alphabetical")]
    Alphabetical,
    #[default]
    #[serde(rename = "manual")]
    Manual,
}

impl SortBy {
    /// Display name for the settings form
    pub fn name(&self) -> &'static str {
        match self {
            SortBy::CreatedAt => "Newest first",
            SortBy::Alphabetical => "Alphabetical",
            SortBy::Manual => "Manual",
        }
    }

    /// Next mode in the settings cycle
    pub fn next(&self) -> Self {
        match self {
            SortBy::Manual => SortBy::CreatedAt,
            SortBy::CreatedAt => SortBy::Alphabetical,
            SortBy::Alphabetical => SortBy::Manual,
        }
    }
}

/// Color theme preference (stored, not interpreted by the core)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

/// Fixed palette a group may be tagged with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
}

impl GroupColor {
    /// Parse a palette name like "blue"
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "purple" => Some(Self::Purple),
            "orange" => Some(Self::Orange),
            "pink" => Some(Self::Pink),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::Pink => "pink",
        }
    }

    pub fn all() -> &'static [GroupColor] {
        &[
            GroupColor::Blue,
            GroupColor::Green,
            GroupColor::Purple,
            GroupColor::Orange,
            GroupColor::Pink,
        ]
    }
}

/// Phase of the Pomodoro timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PomodoroPhase {
    Idle,
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroPhase {
    /// Label shown above the countdown
    pub fn label(&self) -> &'static str {
        match self {
            PomodoroPhase::Idle => "Ready",
            PomodoroPhase::Work => "Work Time",
            PomodoroPhase::ShortBreak => "Short Break",
            PomodoroPhase::LongBreak => "Long Break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, PomodoroPhase::ShortBreak | PomodoroPhase::LongBreak)
    }
}

/// UI mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Normal,
    AddingTask,
    AddingGroup,
    EditingTask,
    EditingGroup,
    ConfirmDelete,
    Settings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_wire_names() {
        assert_eq!(serde_json::to_string(&SortBy::CreatedAt).unwrap(), "\"createdAt\"");
        assert_eq!(serde_json::to_string(&SortBy::Manual).unwrap(), "\"manual\"");
        let parsed: SortBy = serde_json::from_str("\"alphabetical\"").unwrap();
        assert_eq!(parsed, SortBy::Alphabetical);
    }

    #[test]
    fn test_sort_by_cycle_returns_to_start() {
        let start = SortBy::Manual;
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn test_group_color_from_name() {
        assert_eq!(GroupColor::from_name("blue"), Some(GroupColor::Blue));
        assert_eq!(GroupColor::from_name("PINK"), Some(GroupColor::Pink));
        assert_eq!(GroupColor::from_name("teal"), None);
    }

    #[test]
    fn test_phase_wire_names() {
        assert_eq!(
            serde_json::to_string(&PomodoroPhase::ShortBreak).unwrap(),
            "\"shortBreak\""
        );
        assert!(PomodoroPhase::LongBreak.is_break());
        assert!(!PomodoroPhase::Work.is_break());
    }
}
