pub mod history_pane;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod pomodoro_pane;
pub mod settings_form;
pub mod status_bar;
pub mod styles;

use crate::app::App;
use crate::domain::UiMode;
use history_pane::render_history_pane;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_delete_modal;
use pomodoro_pane::render_pomodoro_pane;
use ratatui::{widgets::Block, Frame};
use settings_form::render_settings_form;
use status_bar::render_status_bar;
use styles::base_style;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &App) {
    let size = f.size();
    let layout = create_layout(size, app.show_pomodoro, app.show_history);

    // Theme background
    f.render_widget(Block::default().style(base_style(app.store.settings().theme)), size);

    render_keybindings(f, layout.keybindings_area);
    render_list_pane(f, app, layout.list_area);

    if let Some(pomodoro_area) = layout.pomodoro_area {
        render_pomodoro_pane(f, app, pomodoro_area);
    }
    if let Some(history_area) = layout.history_area {
        render_history_pane(f, app, history_area);
    }

    render_status_bar(f, app, layout.status_area);

    match app.ui_mode {
        UiMode::ConfirmDelete => render_delete_modal(f, app, size),
        UiMode::AddingTask | UiMode::AddingGroup | UiMode::EditingTask | UiMode::EditingGroup => {
            render_input_form(f, app, size)
        }
        UiMode::Settings => render_settings_form(f, app, size),
        UiMode::Normal => {}
    }
}
