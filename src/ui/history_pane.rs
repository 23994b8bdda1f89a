use crate::app::App;
use crate::domain::{HistoryEntry, Theme};
use crate::ui::styles::{border_style, default_style, muted_style, success_style, title_style};
use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Create a line for one history entry
fn create_history_line(entry: &HistoryEntry, theme: Theme) -> Line<'static> {
    let when = DateTime::from_timestamp_millis(entry.completed_at)
        .map(|at| at.with_timezone(&Local).format("%m-%d %H:%M").to_string())
        .unwrap_or_default();

    let mut spans = vec![
        Span::styled(format!("{} ", when), muted_style()),
        Span::styled("✓ ", success_style()),
        Span::styled(entry.task_title.clone(), default_style(theme)),
    ];
    if let Some(group) = &entry.group_name {
        spans.push(Span::styled(format!("  ({})", group), muted_style()));
    }

    Line::from(spans)
}

/// Render the completion history pane, newest first
pub fn render_history_pane(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.store.settings().theme;
    let history = app.store.history();

    let items: Vec<ListItem> = history
        .iter()
        .map(|entry| ListItem::new(create_history_line(entry, theme)))
        .collect();

    let title = format!(" History ({}) ", history.len());

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style(theme))),
    );

    f.render_widget(list, area);
}
