use crate::app::App;
use crate::domain::UiMode;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.ui_mode {
        UiMode::Normal => handle_normal_mode(app, key),
        UiMode::ConfirmDelete => handle_confirm_delete_mode(app, key),
        UiMode::AddingTask | UiMode::AddingGroup | UiMode::EditingTask | UiMode::EditingGroup => {
            handle_input_form_mode(app, key)
        }
        UiMode::Settings => handle_settings_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Navigation (with Shift modifier for reordering)
        KeyCode::Up => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_item_up();
            } else {
                app.move_selection_up();
            }
        }
        KeyCode::Down => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.move_item_down();
            } else {
                app.move_selection_down();
            }
        }

        // Complete task
        KeyCode::Enter => app.complete_selected(),

        // Add task / group
        KeyCode::Char('a') | KeyCode::Char('A') => app.start_add_task(),
        KeyCode::Char('g') | KeyCode::Char('G') => app.start_add_group(),

        // Edit task, or rename/recolor the group under the cursor
        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit(),

        // Delete task or group (asks first)
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.request_delete(),

        // Collapse/expand group
        KeyCode::Char(' ') => app.toggle_expand(),

        // Pomodoro controls
        KeyCode::Char('p') | KeyCode::Char('P') => app.toggle_pomodoro(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset_pomodoro(),

        // Voice command start/stop
        KeyCode::Char('v') | KeyCode::Char('V') => app.toggle_voice(),

        // Views
        KeyCode::Char('c') | KeyCode::Char('C') => app.toggle_show_completed(),
        KeyCode::Char('h') => app.toggle_show_history(),
        KeyCode::Char('t') | KeyCode::Char('T') => app.toggle_show_pomodoro(),

        KeyCode::Char('H') => app.clear_history(),

        KeyCode::Char('s') | KeyCode::Char('S') => app.open_settings(),

        // Quit
        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while a delete waits for confirmation
fn handle_confirm_delete_mode(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

/// Handle keys in input form mode (adding or editing a task/group)
fn handle_input_form_mode(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        // Submit form
        KeyCode::Enter => app.submit_input_form(),

        // Cancel form
        KeyCode::Esc => app.cancel_input_form(),

        // Switch between title and description
        KeyCode::Tab => app.input_form_toggle_field(),

        KeyCode::Backspace => app.input_form_backspace(),

        // Cycle group / color
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_form_cycle_choice()
        }

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input_form_add_char(c)
        }

        _ => {}
    }
    Ok(false)
}

/// Handle keys in the settings form
fn handle_settings_mode(app: &mut App, key: KeyEvent) -> Result<bool> {
    let on_toggle_field = app.settings_form.as_ref().is_some_and(|f| f.field >= 5);

    match key.code {
        KeyCode::Enter => app.save_settings(),
        KeyCode::Esc => app.cancel_settings(),

        KeyCode::Up | KeyCode::BackTab => app.settings_next_field(false),
        KeyCode::Down | KeyCode::Tab => app.settings_next_field(true),

        KeyCode::Left | KeyCode::Right => app.settings_toggle(),
        KeyCode::Char(' ') if on_toggle_field => app.settings_toggle(),

        KeyCode::Backspace => app.settings_backspace(),

        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.settings_add_char(c)
        }

        _ => {}
    }
    Ok(false)
}
