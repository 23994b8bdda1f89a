use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main layout structure
pub struct MainLayout {
    pub keybindings_area: Rect,
    pub list_area: Rect,
    pub pomodoro_area: Option<Rect>,
    pub history_area: Option<Rect>,
    pub status_area: Rect,
}

/// Create the main layout
/// - Top bar: keybindings (1 row)
/// - Main area: task list (65%) | side column (35%) when any side pane shows
///   - Side column: Pomodoro timer above the completion history
/// - Bottom bar: status line (1 row)
pub fn create_layout(area: Rect, show_pomodoro: bool, show_history: bool) -> MainLayout {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Keybindings bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status line
        ])
        .split(area);

    let keybindings_area = main_chunks[0];
    let content_area = main_chunks[1];
    let status_area = main_chunks[2];

    if !show_pomodoro && !show_history {
        return MainLayout {
            keybindings_area,
            list_area: content_area,
            pomodoro_area: None,
            history_area: None,
            status_area,
        };
    }

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(content_area);
    let side = horizontal[1];

    let (pomodoro_area, history_area) = match (show_pomodoro, show_history) {
        (true, true) => {
            let column = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(9), // Pomodoro pane
                    Constraint::Min(0),    // History pane
                ])
                .split(side);
            (Some(column[0]), Some(column[1]))
        }
        (true, false) => (Some(side), None),
        _ => (None, Some(side)),
    };

    MainLayout {
        keybindings_area,
        list_area: horizontal[0],
        pomodoro_area,
        history_area,
        status_area,
    }
}

/// Create a centered modal area of the given height
pub fn create_modal_area(area: Rect, height: u16) -> Rect {
    let height = height.min(area.height);
    let vertical_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(20),
            Constraint::Percentage(60),
            Constraint::Percentage(20),
        ])
        .split(vertical_chunks[1]);

    horizontal_chunks[1]
}
