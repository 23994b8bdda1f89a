use crate::ui::styles::hint_style;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::raw(" ↑/↓ select   "),
        Span::raw("Shift+↑/↓ reorder   "),
        Span::raw("Enter done   "),
        Span::raw("a add   "),
        Span::raw("g group   "),
        Span::raw("e edit   "),
        Span::raw("x delete   "),
        Span::raw("Space fold   "),
        Span::raw("p timer   "),
        Span::raw("r reset   "),
        Span::raw("v voice   "),
        Span::raw("c done-view   "),
        Span::raw("h history   "),
        Span::raw("H clear-history   "),
        Span::raw("t timer-view   "),
        Span::raw("s settings   "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(hint_style());
    f.render_widget(paragraph, area);
}
