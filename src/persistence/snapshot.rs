use super::storage::StateStorage;
use crate::domain::{now_millis, AppState};
use anyhow::Result;
use tracing::{debug, error, warn};

/// Load the application state, falling back to defaults.
///
/// Missing data, unreadable storage and malformed JSON all yield
/// `AppState::default()`; partially-present settings are completed field by
/// field from the defaults.
pub fn load_state(storage: &dyn StateStorage) -> AppState {
    let raw = match storage.read() {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no stored state, starting from defaults");
            return AppState::default();
        }
        Err(e) => {
            warn!(error = %e, "failed to read stored state, starting from defaults");
            return AppState::default();
        }
    };

    match serde_json::from_str::<AppState>(&raw) {
        Ok(mut state) => {
            state.settings.pomodoro = state.settings.pomodoro.clamped();
            debug!(
                tasks = state.tasks.len(),
                groups = state.groups.len(),
                history = state.history.len(),
                "loaded stored state"
            );
            state
        }
        Err(e) => {
            warn!(error = %e, "stored state is malformed, starting from defaults");
            AppState::default()
        }
    }
}

/// Serialize and write the whole state, stamping `lastUpdated`.
fn write_state(storage: &dyn StateStorage, state: &AppState) -> Result<()> {
    let mut snapshot = state.clone();
    snapshot.last_updated = now_millis();
    let json = serde_json::to_string(&snapshot)?;
    storage.write(&json)
}

/// Persist the state. Failures are logged and swallowed; the in-memory state
/// stays authoritative.
pub fn save_state(storage: &dyn StateStorage, state: &AppState) {
    if let Err(e) = write_state(storage, state) {
        error!(error = %e, "failed to save state");
    }
}
