use crate::app::{App, SettingsFormState};
use crate::ui::{
    layout::create_modal_area,
    styles::{modal_bg_style, modal_title_style},
};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

fn on_off(value: bool) -> String {
    let text = if value { "on" } else { "off" };
    text.to_string()
}

/// Mask all but the last four characters of the key
fn masked_key(key: &str) -> String {
    let count = key.chars().count();
    if count <= 4 {
        return key.to_string();
    }
    let tail: String = key.chars().skip(count - 4).collect();
    format!("{}{}", "•".repeat(count - 4), tail)
}

fn rows(form: &SettingsFormState) -> Vec<(&'static str, String)> {
    vec![
        ("OpenAI API key", masked_key(&form.api_key)),
        ("Work (min)", form.work_duration.clone()),
        ("Short break (min)", form.short_break.clone()),
        ("Long break (min)", form.long_break.clone()),
        ("Long break every", form.long_break_interval.clone()),
        ("Auto-start breaks", on_off(form.auto_start_breaks)),
        ("Auto-start pomodoros", on_off(form.auto_start_pomodoros)),
        ("Notifications", on_off(form.notifications_enabled)),
        ("Sort by", form.sort_by.name().to_string()),
        ("Theme", form.theme.name().to_string()),
    ]
}

/// Render the settings form
pub fn render_settings_form(f: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.settings_form else {
        return;
    };
    let modal_area = create_modal_area(area, 16);

    f.render_widget(Clear, modal_area);

    let mut lines = vec![Line::raw("")];
    for (idx, (label, value)) in rows(form).into_iter().enumerate() {
        let marker = if idx == form.field { "▶ " } else { "  " };
        let value_style = if idx == form.field {
            modal_title_style().add_modifier(Modifier::UNDERLINED)
        } else {
            Style::default()
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{}{:<22}", marker, label)),
            Span::styled(value, value_style),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw("↑/↓ field  ·  Space toggle  ·  Enter save  ·  Esc cancel"));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Settings ", modal_title_style()))
            .style(modal_bg_style()),
    );

    f.render_widget(paragraph, modal_area);
}
