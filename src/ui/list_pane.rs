use crate::app::App;
use crate::domain::{grouped_active_tasks, FlatRow, Section, Task, TaskGroup, Theme};
use crate::ui::styles::{
    border_style, default_style, done_style, group_style, muted_style, selected_style,
    success_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

fn create_group_line(group: &TaskGroup, open_count: usize, theme: Theme) -> Line<'static> {
    let arrow = if group.expanded { "▾" } else { "▸" };
    Line::from(vec![
        Span::styled(format!("{} {}", arrow, group.name), group_style(group.color, theme)),
        Span::styled(format!("  ({})", open_count), muted_style()),
    ])
}

fn create_task_line(task: &Task, section: Section, theme: Theme) -> Line<'static> {
    let mut spans = Vec::new();

    if section == Section::Group {
        spans.push(Span::raw("   "));
    }

    if task.completed {
        spans.push(Span::styled("[✓] ", success_style()));
        spans.push(Span::styled(task.title.clone(), done_style()));
    } else {
        spans.push(Span::styled("[ ] ", default_style(theme)));
        spans.push(Span::styled(task.title.clone(), default_style(theme)));
    }

    if let Some(description) = &task.description {
        spans.push(Span::styled(format!("  {}", description), muted_style()));
    }

    Line::from(spans)
}

/// Render the task list: groups, ungrouped tasks, completed tasks
pub fn render_list_pane(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.store.settings().theme;
    let tasks = app.store.tasks();
    let rows = app.rows();

    let mut items: Vec<ListItem> = Vec::new();
    let mut selected = None;
    let mut last_section = None;

    for (idx, row) in rows.iter().enumerate() {
        // Section separators between ungrouped and completed blocks
        if let FlatRow::Task { section, .. } = row {
            if *section != Section::Group && last_section != Some(*section) {
                let label = match section {
                    Section::Completed => "Completed",
                    _ => "Tasks",
                };
                items.push(ListItem::new(Line::styled(
                    format!("── {} ──", label),
                    muted_style(),
                )));
            }
            last_section = Some(*section);
        }

        let line = match row {
            FlatRow::GroupHeader { group_id } => {
                let Some(group) = app.store.groups().iter().find(|g| &g.id == group_id) else {
                    continue;
                };
                create_group_line(group, grouped_active_tasks(tasks, group_id).len(), theme)
            }
            FlatRow::Task { task_id, section } => {
                let Some(task) = tasks.iter().find(|t| &t.id == task_id) else {
                    continue;
                };
                create_task_line(task, *section, theme)
            }
        };

        let style = if idx == app.selected_index {
            selected = Some(items.len());
            selected_style(theme)
        } else {
            default_style(theme)
        };
        items.push(ListItem::new(line).style(style));
    }

    let open = tasks.iter().filter(|t| !t.completed).count();
    let title = format!(
        " TaskiPin 📌 ({} open) · sort: {} ",
        open,
        app.store.settings().sort_by.name()
    );

    let empty = items.is_empty();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(title, title_style(theme))),
    );

    if empty {
        f.render_widget(list, area);
        return;
    }

    let mut state = ListState::default();
    state.select(selected);
    f.render_stateful_widget(list, area, &mut state);
}
