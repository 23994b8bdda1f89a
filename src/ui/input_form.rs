use crate::app::{App, FormTarget};
use crate::domain::GroupColor;
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

fn field_line(value: &str, editing: bool) -> Line<'_> {
    Line::from(vec![
        Span::raw("> "),
        Span::styled(value, modal_title_style()),
        if editing {
            Span::styled("█", modal_title_style()) // Cursor
        } else {
            Span::raw("")
        },
    ])
}

fn label(text: &str, editing: bool) -> Line<'static> {
    if editing {
        Line::raw(format!("{} (editing)", text))
    } else {
        Line::raw(text.to_string())
    }
}

/// Render the input form for adding tasks/groups and editing tasks
pub fn render_input_form(f: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.input_form else {
        return;
    };
    let modal_area = create_modal_area(area, 12);

    // Clear the area behind the form
    f.render_widget(Clear, modal_area);

    let title_text = match form.target {
        FormTarget::NewTask => " Add Task ",
        FormTarget::NewGroup => " Add Group ",
        FormTarget::EditTask(_) => " Edit Task ",
        FormTarget::EditGroup(_) => " Edit Group ",
    };
    let name_label = if form.target.is_group() {
        "Name:"
    } else {
        "Title:"
    };

    let mut lines = vec![
        Line::raw(""),
        label(name_label, form.editing_field == 0),
        field_line(&form.title, form.editing_field == 0),
        Line::raw(""),
    ];

    match form.target {
        FormTarget::NewGroup | FormTarget::EditGroup(_) => {
            let color = form
                .choice
                .and_then(|i| GroupColor::all().get(i))
                .map(|c| c.name())
                .unwrap_or("none");
            lines.push(Line::from(vec![
                Span::raw("Color: "),
                Span::styled(color, modal_title_style()),
                Span::raw("  (Ctrl+G to cycle)"),
            ]));
        }
        _ => {
            lines.push(label("Description:", form.editing_field == 1));
            lines.push(field_line(&form.description, form.editing_field == 1));
            if form.target == FormTarget::NewTask {
                let group = form
                    .choice
                    .and_then(|i| app.store.groups().get(i))
                    .map(|g| g.name.as_str())
                    .unwrap_or("none");
                lines.push(Line::from(vec![
                    Span::raw("Group: "),
                    Span::styled(group, modal_title_style()),
                    Span::raw("  (Ctrl+G to cycle)"),
                ]));
            }
        }
    }

    lines.push(Line::raw(""));
    lines.push(Line::raw("Tab to switch fields  ·  Enter to submit  ·  Esc to cancel"));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title_text, modal_title_style()))
                .style(modal_bg_style()),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, modal_area);
}
