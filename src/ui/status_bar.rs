use crate::app::App;
use crate::ui::styles::{error_style, hint_style, recording_style, success_style};
use crate::voice::VoiceStatus;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the one-line status bar: voice indicator then the latest message
pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();

    match app.voice.status() {
        VoiceStatus::Listening => spans.push(Span::styled(" ● REC ", recording_style())),
        VoiceStatus::Processing => spans.push(Span::styled(" … ", hint_style())),
        VoiceStatus::Idle => {}
    }

    if let Some(status) = &app.status {
        let style = if status.is_error { error_style() } else { success_style() };
        spans.push(Span::styled(format!(" {}", status.text), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
