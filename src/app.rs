use crate::domain::{
    flatten_rows, move_task, FlatRow, GroupColor, GroupPatch, PomodoroPhase, PomodoroSettings, Section,
    SettingsPatch, SortBy, Task, TaskPatch, Theme, UiMode, MAX_DURATION_MINUTES,
};
use crate::notifications::{phase_message, Notifier};
use crate::pomodoro::PomodoroEngine;
use crate::store::TaskStore;
use crate::ticker::status_expired;
use crate::voice::{apply_command, OpenAiClient, SpeechApi, VoiceBridge, VoiceOutcome, VoiceStatus};
use reqwest::Url;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

/// What the input form creates or edits
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    NewTask,
    NewGroup,
    EditTask(String),
    EditGroup(String),
}

impl FormTarget {
    pub fn is_group(&self) -> bool {
        matches!(self, FormTarget::NewGroup | FormTarget::EditGroup(_))
    }
}

/// Input form state for tasks and groups
#[derive(Debug, Clone)]
pub struct InputFormState {
    pub target: FormTarget,
    pub title: String,
    pub description: String,
    /// Group for new tasks / palette color for new groups (index, None = none)
    pub choice: Option<usize>,
    pub editing_field: usize, // 0 = title, 1 = description / choice
}

/// Settings form fields, edited as text and validated on save
#[derive(Debug, Clone)]
pub struct SettingsFormState {
    pub api_key: String,
    pub work_duration: String,
    pub short_break: String,
    pub long_break: String,
    pub long_break_interval: String,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
    pub notifications_enabled: bool,
    pub sort_by: SortBy,
    pub theme: Theme,
    pub field: usize,
}

/// Number of rows in the settings form
pub const SETTINGS_FIELDS: usize = 10;

/// Something waiting for delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingDelete {
    Task { id: String, title: String },
    Group { id: String, name: String },
}

impl PendingDelete {
    pub fn label(&self) -> String {
        match self {
            PendingDelete::Task { title, .. } => title.clone(),
            PendingDelete::Group { name, .. } => format!("group \"{}\"", name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub shown_at: Instant,
}

/// Main application state
pub struct App {
    pub store: TaskStore,
    pub pomodoro: PomodoroEngine,
    pub notifier: Box<dyn Notifier>,
    pub voice: VoiceBridge,
    pub api_base: Url,
    pub selected_index: usize,
    pub ui_mode: UiMode,
    pub input_form: Option<InputFormState>,
    pub settings_form: Option<SettingsFormState>,
    pub pending_delete: Option<PendingDelete>,
    pub status: Option<StatusMessage>,
    pub show_completed: bool,
    pub show_history: bool,
    pub show_pomodoro: bool,
}

impl App {
    pub fn new(
        store: TaskStore,
        notifier: Box<dyn Notifier>,
        voice: VoiceBridge,
        api_base: Url,
    ) -> Self {
        let pomodoro = PomodoroEngine::new(&store.settings().pomodoro);
        Self {
            store,
            pomodoro,
            notifier,
            voice,
            api_base,
            selected_index: 0,
            ui_mode: UiMode::Normal,
            input_form: None,
            settings_form: None,
            pending_delete: None,
            status: None,
            show_completed: true,
            show_history: true,
            show_pomodoro: true,
        }
    }

    /// Rows currently shown in the task list
    pub fn rows(&self) -> Vec<FlatRow> {
        flatten_rows(
            self.store.tasks(),
            self.store.groups(),
            self.store.settings().sort_by,
            self.show_completed,
        )
    }

    pub fn selected_row(&self) -> Option<FlatRow> {
        self.rows().into_iter().nth(self.selected_index)
    }

    fn selected_task(&self) -> Option<&Task> {
        let row = self.selected_row()?;
        let id = row.task_id()?;
        self.store.tasks().iter().find(|t| t.id == id)
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusMessage {
            text: text.into(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        let len = self.rows().len();
        if self.selected_index + 1 < len {
            self.selected_index += 1;
        }
    }

    /// Move the selected task past its neighbour in the same section
    fn move_item(&mut self, up: bool) {
        let rows = self.rows();
        let Some(FlatRow::Task { task_id, section }) = rows.get(self.selected_index).cloned() else {
            return;
        };
        if section == Section::Completed {
            return;
        }

        let neighbour = if up {
            self.selected_index.checked_sub(1)
        } else {
            Some(self.selected_index + 1)
        };
        let Some(neighbour) = neighbour else {
            return;
        };
        let Some(FlatRow::Task {
            task_id: target_id,
            section: target_section,
        }) = rows.get(neighbour).cloned()
        else {
            return;
        };
        if target_section != section {
            return;
        }

        if let Some(reordered) = move_task(self.store.tasks(), &task_id, &target_id) {
            self.store.reorder_tasks(reordered);
            if let Some(pos) = self.rows().iter().position(|r| r.task_id() == Some(task_id.as_str())) {
                self.selected_index = pos;
            }
        }
    }

    pub fn move_item_up(&mut self) {
        self.move_item(true);
    }

    pub fn move_item_down(&mut self) {
        self.move_item(false);
    }

    /// Complete the selected task
    pub fn complete_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let (id, title) = (task.id.clone(), task.title.clone());
        self.store.complete_task(&id);
        self.set_status(format!("✓ {}", title), false);
        self.clamp_selection();
    }

    /// Collapse/expand the selected group
    pub fn toggle_expand(&mut self) {
        if let Some(FlatRow::GroupHeader { group_id }) = self.selected_row() {
            self.store.toggle_group_expanded(&group_id);
            self.clamp_selection();
        }
    }

    /// Ask for confirmation before deleting the selected task or group
    pub fn request_delete(&mut self) {
        let pending = match self.selected_row() {
            Some(FlatRow::GroupHeader { group_id }) => self
                .store
                .groups()
                .iter()
                .find(|g| g.id == group_id)
                .map(|g| PendingDelete::Group {
                    id: g.id.clone(),
                    name: g.name.clone(),
                }),
            Some(FlatRow::Task { task_id, .. }) => self
                .store
                .tasks()
                .iter()
                .find(|t| t.id == task_id)
                .map(|t| PendingDelete::Task {
                    id: t.id.clone(),
                    title: t.title.clone(),
                }),
            None => None,
        };
        if let Some(pending) = pending {
            self.pending_delete = Some(pending);
            self.ui_mode = UiMode::ConfirmDelete;
        }
    }

    pub fn confirm_delete(&mut self) {
        match self.pending_delete.take() {
            Some(PendingDelete::Task { id, .. }) => self.store.delete_task(&id),
            Some(PendingDelete::Group { id, .. }) => self.store.delete_group(&id),
            None => {}
        }
        self.ui_mode = UiMode::Normal;
        self.clamp_selection();
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Start adding a new task (opens input form). Defaults to the group
    /// under the cursor.
    pub fn start_add_task(&mut self) {
        let group_id = match self.selected_row() {
            Some(FlatRow::GroupHeader { group_id }) => Some(group_id),
            Some(FlatRow::Task { task_id, section: Section::Group }) => self
                .store
                .tasks()
                .iter()
                .find(|t| t.id == task_id)
                .and_then(|t| t.group_id.clone()),
            _ => None,
        };
        let choice = group_id.and_then(|gid| self.store.groups().iter().position(|g| g.id == gid));

        self.input_form = Some(InputFormState {
            target: FormTarget::NewTask,
            title: String::new(),
            description: String::new(),
            choice,
            editing_field: 0,
        });
        self.ui_mode = UiMode::AddingTask;
    }

    pub fn start_add_group(&mut self) {
        self.input_form = Some(InputFormState {
            target: FormTarget::NewGroup,
            title: String::new(),
            description: String::new(),
            choice: None,
            editing_field: 0,
        });
        self.ui_mode = UiMode::AddingGroup;
    }

    /// Edit the selected task's title and description, or the selected
    /// group's name and color
    pub fn start_edit(&mut self) {
        if let Some(FlatRow::GroupHeader { group_id }) = self.selected_row() {
            let Some(group) = self.store.groups().iter().find(|g| g.id == group_id) else {
                return;
            };
            let choice = group
                .color
                .and_then(|c| GroupColor::all().iter().position(|p| *p == c));
            self.input_form = Some(InputFormState {
                target: FormTarget::EditGroup(group.id.clone()),
                title: group.name.clone(),
                description: String::new(),
                choice,
                editing_field: 0,
            });
            self.ui_mode = UiMode::EditingGroup;
            return;
        }

        let Some(task) = self.selected_task() else {
            return;
        };
        self.input_form = Some(InputFormState {
            target: FormTarget::EditTask(task.id.clone()),
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            choice: None,
            editing_field: 0,
        });
        self.ui_mode = UiMode::EditingTask;
    }

    /// Groups only have a name field; Tab is a no-op for them
    pub fn input_form_toggle_field(&mut self) {
        if let Some(form) = &mut self.input_form {
            if !form.target.is_group() {
                form.editing_field = (form.editing_field + 1) % 2;
            }
        }
    }

    /// Cycle the group (new task) or color (new group) choice
    pub fn input_form_cycle_choice(&mut self) {
        let count = match self.input_form.as_ref().map(|f| &f.target) {
            Some(FormTarget::NewTask) => self.store.groups().len(),
            Some(target) if target.is_group() => GroupColor::all().len(),
            _ => return,
        };
        if let Some(form) = &mut self.input_form {
            form.choice = match form.choice {
                None if count > 0 => Some(0),
                Some(i) if i + 1 < count => Some(i + 1),
                _ => None,
            };
        }
    }

    pub fn input_form_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.input_form {
            match form.editing_field {
                0 => form.title.push(c),
                _ => form.description.push(c),
            }
        }
    }

    pub fn input_form_backspace(&mut self) {
        if let Some(form) = &mut self.input_form {
            match form.editing_field {
                0 => {
                    form.title.pop();
                }
                _ => {
                    form.description.pop();
                }
            }
        }
    }

    /// Submit the input form. Blank titles/names close the form without
    /// changing anything.
    pub fn submit_input_form(&mut self) {
        let Some(form) = self.input_form.take() else {
            return;
        };

        match form.target {
            FormTarget::NewTask => {
                let group_id = form
                    .choice
                    .and_then(|i| self.store.groups().get(i))
                    .map(|g| g.id.clone());
                self.store
                    .add_task(&form.title, Some(&form.description), group_id.as_deref());
            }
            FormTarget::NewGroup => {
                let color = form.choice.and_then(|i| GroupColor::all().get(i).copied());
                self.store.add_group(&form.title, color);
            }
            FormTarget::EditTask(id) => {
                let title = form.title.trim();
                if !title.is_empty() {
                    let description = form.description.trim();
                    self.store.update_task(
                        &id,
                        TaskPatch {
                            title: Some(title.to_string()),
                            description: Some((!description.is_empty()).then(|| description.to_string())),
                            ..Default::default()
                        },
                    );
                }
            }
            FormTarget::EditGroup(id) => {
                let name = form.title.trim();
                if !name.is_empty() {
                    let color = form.choice.and_then(|i| GroupColor::all().get(i).copied());
                    self.store.update_group(
                        &id,
                        GroupPatch {
                            name: Some(name.to_string()),
                            color: Some(color),
                            ..Default::default()
                        },
                    );
                }
            }
        }
        self.ui_mode = UiMode::Normal;
    }

    pub fn cancel_input_form(&mut self) {
        self.input_form = None;
        self.ui_mode = UiMode::Normal;
    }

    /// Open the settings form pre-filled with the current settings
    pub fn open_settings(&mut self) {
        let settings = self.store.settings();
        let p = settings.pomodoro;
        self.settings_form = Some(SettingsFormState {
            api_key: settings.open_ai_api_key.clone(),
            work_duration: p.work_duration.to_string(),
            short_break: p.short_break.to_string(),
            long_break: p.long_break.to_string(),
            long_break_interval: p.long_break_interval.to_string(),
            auto_start_breaks: p.auto_start_breaks,
            auto_start_pomodoros: p.auto_start_pomodoros,
            notifications_enabled: p.notifications_enabled,
            sort_by: settings.sort_by,
            theme: settings.theme,
            field: 0,
        });
        self.ui_mode = UiMode::Settings;
    }

    pub fn settings_next_field(&mut self, forward: bool) {
        if let Some(form) = &mut self.settings_form {
            form.field = if forward {
                (form.field + 1) % SETTINGS_FIELDS
            } else {
                (form.field + SETTINGS_FIELDS - 1) % SETTINGS_FIELDS
            };
        }
    }

    /// Text input for text fields; digits only for the numeric ones
    pub fn settings_add_char(&mut self, c: char) {
        if let Some(form) = &mut self.settings_form {
            match form.field {
                0 => form.api_key.push(c),
                1..=4 if c.is_ascii_digit() => settings_numeric_field(form).push(c),
                _ => {}
            }
        }
    }

    pub fn settings_backspace(&mut self) {
        if let Some(form) = &mut self.settings_form {
            match form.field {
                0 => {
                    form.api_key.pop();
                }
                1..=4 => {
                    settings_numeric_field(form).pop();
                }
                _ => {}
            }
        }
    }

    /// Flip a toggle / cycle a choice field
    pub fn settings_toggle(&mut self) {
        if let Some(form) = &mut self.settings_form {
            match form.field {
                5 => form.auto_start_breaks = !form.auto_start_breaks,
                6 => form.auto_start_pomodoros = !form.auto_start_pomodoros,
                7 => form.notifications_enabled = !form.notifications_enabled,
                8 => form.sort_by = form.sort_by.next(),
                9 => form.theme = form.theme.toggled(),
                _ => {}
            }
        }
    }

    /// Validate and store the settings form as one shallow-merge update
    pub fn save_settings(&mut self) {
        let Some(form) = self.settings_form.as_ref() else {
            return;
        };

        let parse = |raw: &str| raw.trim().parse::<u32>().ok();
        let minutes = |raw: &str| parse(raw).filter(|v| (1..=MAX_DURATION_MINUTES).contains(v));
        let (Some(work), Some(short), Some(long), Some(interval)) = (
            minutes(&form.work_duration),
            minutes(&form.short_break),
            minutes(&form.long_break),
            parse(&form.long_break_interval).filter(|v| *v > 0),
        ) else {
            self.set_status(
                format!("Durations must be 1-{} minutes and interval positive", MAX_DURATION_MINUTES),
                true,
            );
            return;
        };

        let patch = SettingsPatch {
            open_ai_api_key: Some(form.api_key.trim().to_string()),
            pomodoro: Some(PomodoroSettings {
                work_duration: work,
                short_break: short,
                long_break: long,
                long_break_interval: interval,
                auto_start_breaks: form.auto_start_breaks,
                auto_start_pomodoros: form.auto_start_pomodoros,
                notifications_enabled: form.notifications_enabled,
            }),
            sort_by: Some(form.sort_by),
            theme: Some(form.theme),
        };
        self.store.update_settings(patch);
        self.settings_form = None;
        self.ui_mode = UiMode::Normal;
        self.clamp_selection();
        self.set_status("Settings saved", false);
    }

    pub fn cancel_settings(&mut self) {
        self.settings_form = None;
        self.ui_mode = UiMode::Normal;
    }

    pub fn clear_history(&mut self) {
        self.store.clear_history();
        self.set_status("History cleared", false);
    }

    pub fn toggle_show_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.clamp_selection();
    }

    pub fn toggle_show_history(&mut self) {
        self.show_history = !self.show_history;
    }

    pub fn toggle_show_pomodoro(&mut self) {
        self.show_pomodoro = !self.show_pomodoro;
    }

    pub fn toggle_pomodoro(&mut self) {
        let settings = self.store.settings().pomodoro;
        self.pomodoro.toggle(&settings, Instant::now());
    }

    pub fn reset_pomodoro(&mut self) {
        let settings = self.store.settings().pomodoro;
        self.pomodoro.reset(&settings);
    }

    /// Start or stop a voice recording
    pub fn toggle_voice(&mut self) {
        let result = if self.voice.status() == VoiceStatus::Listening {
            let api: Arc<dyn SpeechApi> = Arc::new(OpenAiClient::new(
                self.api_base.clone(),
                self.store.settings().open_ai_api_key.clone(),
            ));
            self.voice.stop_recording(api).map(|_| "Processing...")
        } else {
            let key = self.store.settings().open_ai_api_key.clone();
            self.voice.start_recording(&key).map(|_| "Listening... press v to stop")
        };

        match result {
            Ok(message) => self.set_status(message, false),
            Err(e) => self.set_status(e.to_string(), true),
        }
    }

    fn handle_voice_result(&mut self) {
        let Some(result) = self.voice.poll() else {
            return;
        };
        match result {
            Ok(round) => {
                let outcome = apply_command(&mut self.store, &round.command);
                info!(?outcome, "applied voice command");
                let text = match outcome {
                    VoiceOutcome::TaskCreated(title) => format!("Added \"{}\"", title),
                    VoiceOutcome::TaskCompleted(title) => format!("✓ {}", title),
                    VoiceOutcome::TaskDeleted(title) => format!("Deleted \"{}\"", title),
                    VoiceOutcome::GroupCreated(name) => format!("Created group \"{}\"", name),
                    VoiceOutcome::NoMatch | VoiceOutcome::Ignored => round.transcript,
                };
                self.set_status(text, false);
                self.clamp_selection();
            }
            Err(e) => self.set_status(e.to_string(), true),
        }
    }

    /// Advance timers, collect voice results, expire the status line
    pub fn tick(&mut self) {
        let now = Instant::now();
        let settings = self.store.settings().pomodoro;

        if let Some(phase) = self.pomodoro.tick(&settings, now, self.notifier.as_mut()) {
            self.on_phase_change(phase);
        }

        self.handle_voice_result();

        if let Some(status) = &self.status {
            if status_expired(status.shown_at, now) {
                self.status = None;
            }
        }
    }

    fn on_phase_change(&mut self, phase: PomodoroPhase) {
        self.set_status(phase_message(phase), false);
    }
}

fn settings_numeric_field(form: &mut SettingsFormState) -> &mut String {
    match form.field {
        1 => &mut form.work_duration,
        2 => &mut form.short_break,
        3 => &mut form.long_break,
        _ => &mut form.long_break_interval,
    }
}
