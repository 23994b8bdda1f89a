//! Desktop notification support.
//! Currently only implements macOS notifications.

use crate::domain::PomodoroPhase;
#[cfg(target_os = "macos")]
use std::process::Command;

/// Whether the user allows notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPermission {
    Granted,
    Denied,
    /// Not asked yet
    Default,
}

/// Sink for phase-change notifications
pub trait Notifier {
    fn permission(&self) -> NotificationPermission;

    /// Ask for permission; resolves the state for later cycles
    fn request_permission(&mut self);

    fn notify(&mut self, phase: PomodoroPhase);
}

/// Message body for a phase change
pub fn phase_message(phase: PomodoroPhase) -> &'static str {
    if phase == PomodoroPhase::Work {
        "Work time started!"
    } else {
        "Break time started!"
    }
}

/// Notifier backed by the platform's notification center
pub struct DesktopNotifier {
    permission: NotificationPermission,
}

impl DesktopNotifier {
    pub fn new() -> Self {
        Self {
            permission: NotificationPermission::Default,
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for DesktopNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) {
        self.permission = if cfg!(target_os = "macos") {
            NotificationPermission::Granted
        } else {
            NotificationPermission::Denied
        };
        tracing::debug!(permission = ?self.permission, "notification permission resolved");
    }

    fn notify(&mut self, phase: PomodoroPhase) {
        #[cfg(target_os = "macos")]
        {
            let script = format!(
                r#"display notification "{}" with title "TaskiPin - {}""#,
                phase_message(phase),
                phase.label()
            );

            if let Err(e) = Command::new("osascript").arg("-e").arg(&script).output() {
                tracing::warn!(error = %e, "failed to send notification");
            }
        }

        #[cfg(not(target_os = "macos"))]
        {
            // No-op on other platforms
            let _ = phase;
        }
    }
}
