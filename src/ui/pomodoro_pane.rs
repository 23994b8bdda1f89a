use crate::app::App;
use crate::pomodoro::{format_countdown, phase_secs};
use crate::ui::styles::{border_style, default_style, muted_style, phase_gauge_style, title_style};
use crate::voice::VoiceStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Render the Pomodoro timer pane
pub fn render_pomodoro_pane(f: &mut Frame, app: &App, area: Rect) {
    let theme = app.store.settings().theme;
    let settings = app.store.settings().pomodoro;
    let engine = &app.pomodoro;
    let phase = engine.phase();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Pomodoro 🍅 ", title_style(theme)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Phase + countdown
            Constraint::Length(1), // Gauge
            Constraint::Min(0),    // Sessions / voice
        ])
        .split(inner);

    let state = if engine.is_running() { "running" } else { "paused" };
    let header = vec![
        Line::from(Span::styled(phase.label(), title_style(theme))),
        Line::from(vec![
            Span::styled(format_countdown(engine.remaining_secs()), default_style(theme)),
            Span::styled(format!("  {}", state), muted_style()),
        ]),
    ];
    f.render_widget(Paragraph::new(header), chunks[0]);

    // Fraction of the current phase already elapsed
    let total = phase_secs(&settings, phase).max(1);
    let ratio = 1.0 - f64::from(engine.remaining_secs().min(total)) / f64::from(total);
    let gauge = Gauge::default()
        .gauge_style(phase_gauge_style(phase))
        .ratio(ratio.clamp(0.0, 1.0))
        .label("");
    f.render_widget(gauge, chunks[1]);

    let voice = match app.voice.status() {
        VoiceStatus::Idle if !app.store.settings().has_api_key() => "set an API key in settings",
        VoiceStatus::Idle => "idle",
        VoiceStatus::Listening => "listening",
        VoiceStatus::Processing => "processing",
    };
    let footer = vec![
        Line::from(Span::styled(
            format!(
                "Sessions: {}  (long break every {})",
                engine.completed_sessions(),
                settings.long_break_interval
            ),
            muted_style(),
        )),
        Line::from(Span::styled(format!("Voice: {}", voice), muted_style())),
    ];
    f.render_widget(Paragraph::new(footer), chunks[2]);
}
