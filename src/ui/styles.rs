use crate::domain::{GroupColor, PomodoroPhase, Theme};
use ratatui::style::{Color, Modifier, Style};

/// Screen background and default text for a theme
pub fn base_style(theme: Theme) -> Style {
    match theme {
        Theme::Light => Style::default().fg(Color::Black).bg(Color::White),
        Theme::Dark => Style::default().fg(Color::White).bg(Color::Black),
    }
}

/// Default text style
pub fn default_style(theme: Theme) -> Style {
    match theme {
        Theme::Light => Style::default().fg(Color::Black),
        Theme::Dark => Style::default().fg(Color::White),
    }
}

/// Selected row highlight style
pub fn selected_style(theme: Theme) -> Style {
    let bg = match theme {
        Theme::Light => Color::LightBlue,
        Theme::Dark => Color::LightCyan,
    };
    Style::default()
        .fg(Color::Black)
        .bg(bg)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style(theme: Theme) -> Style {
    let fg = match theme {
        Theme::Light => Color::Blue,
        Theme::Dark => Color::Cyan,
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Secondary text (descriptions, timestamps)
pub fn muted_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Done/completed task style
pub fn done_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Check mark / success style
pub fn success_style() -> Style {
    Style::default().fg(Color::Green)
}

/// Recording indicator
pub fn recording_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD | Modifier::SLOW_BLINK)
}

/// Group header color from the palette (uncolored groups use the title color)
pub fn group_style(color: Option<GroupColor>, theme: Theme) -> Style {
    let fg = match color {
        Some(GroupColor::Blue) => Color::Blue,
        Some(GroupColor::Green) => Color::Green,
        Some(GroupColor::Purple) => Color::Magenta,
        Some(GroupColor::Orange) => Color::Rgb(255, 140, 0),
        Some(GroupColor::Pink) => Color::LightMagenta,
        None => return title_style(theme),
    };
    Style::default().fg(fg).add_modifier(Modifier::BOLD)
}

/// Timer gauge style per phase
pub fn phase_gauge_style(phase: PomodoroPhase) -> Style {
    let fg = match phase {
        PomodoroPhase::Work => Color::Red,
        PomodoroPhase::ShortBreak => Color::Green,
        PomodoroPhase::LongBreak => Color::Blue,
        PomodoroPhase::Idle => Color::Gray,
    };
    Style::default().fg(fg).bg(Color::DarkGray)
}
