use crate::domain::{PomodoroPhase, PomodoroSettings};
use crate::notifications::{NotificationPermission, Notifier};
use std::time::{Duration, Instant};
use tracing::info;

/// Cancellable one-second ticker anchored at the last decrement
#[derive(Debug, Clone, Copy)]
struct Countdown {
    anchor: Instant,
}

impl Countdown {
    fn arm(now: Instant) -> Self {
        Self { anchor: now }
    }

    /// Whole seconds since the anchor; the anchor advances by the seconds
    /// consumed so the fractional remainder carries over.
    fn take_elapsed_secs(&mut self, now: Instant) -> u64 {
        let secs = now.saturating_duration_since(self.anchor).as_secs();
        self.anchor += Duration::from_secs(secs);
        secs
    }
}

/// Work/break cycle driven by wall-clock ticks.
///
/// Only one countdown exists at a time: pausing, resetting and every phase
/// transition drop it, and it is re-armed only when the timer keeps running.
#[derive(Debug)]
pub struct PomodoroEngine {
    phase: PomodoroPhase,
    remaining_secs: u32,
    running: bool,
    completed_sessions: u32,
    countdown: Option<Countdown>,
}

impl PomodoroEngine {
    pub fn new(settings: &PomodoroSettings) -> Self {
        Self {
            phase: PomodoroPhase::Idle,
            remaining_secs: settings.work_secs(),
            running: false,
            completed_sessions: 0,
            countdown: None,
        }
    }

    pub fn phase(&self) -> PomodoroPhase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    /// Start (from idle) or resume the current phase
    pub fn start(&mut self, settings: &PomodoroSettings, now: Instant) {
        if self.phase == PomodoroPhase::Idle {
            self.phase = PomodoroPhase::Work;
            self.remaining_secs = settings.work_secs();
            self.countdown = None;
        }
        self.running = true;
        if self.countdown.is_none() {
            self.countdown = Some(Countdown::arm(now));
        }
    }

    pub fn pause(&mut self) {
        self.running = false;
        self.countdown = None;
    }

    pub fn toggle(&mut self, settings: &PomodoroSettings, now: Instant) {
        if self.running {
            self.pause();
        } else {
            self.start(settings, now);
        }
    }

    /// Back to idle with the session counter cleared
    pub fn reset(&mut self, settings: &PomodoroSettings) {
        self.countdown = None;
        self.running = false;
        self.phase = PomodoroPhase::Idle;
        self.remaining_secs = settings.work_secs();
        self.completed_sessions = 0;
    }

    /// Advance the countdown. Returns the new phase when one just began.
    pub fn tick(
        &mut self,
        settings: &PomodoroSettings,
        now: Instant,
        notifier: &mut dyn Notifier,
    ) -> Option<PomodoroPhase> {
        if self.running && self.remaining_secs > 0 {
            if let Some(countdown) = self.countdown.as_mut() {
                let elapsed = countdown.take_elapsed_secs(now);
                let elapsed = u32::try_from(elapsed).unwrap_or(u32::MAX);
                self.remaining_secs = self.remaining_secs.saturating_sub(elapsed);
            }
        }

        if self.remaining_secs == 0 && self.phase != PomodoroPhase::Idle {
            return Some(self.advance_phase(settings, now, notifier));
        }
        None
    }

    fn advance_phase(
        &mut self,
        settings: &PomodoroSettings,
        now: Instant,
        notifier: &mut dyn Notifier,
    ) -> PomodoroPhase {
        let next = if self.phase == PomodoroPhase::Work {
            self.completed_sessions += 1;
            if self.completed_sessions % settings.long_break_interval.max(1) == 0 {
                PomodoroPhase::LongBreak
            } else {
                PomodoroPhase::ShortBreak
            }
        } else {
            PomodoroPhase::Work
        };

        self.phase = next;
        self.remaining_secs = phase_secs(settings, next);
        self.countdown = None;
        self.running = if next.is_break() {
            settings.auto_start_breaks
        } else {
            settings.auto_start_pomodoros
        };
        if self.running {
            self.countdown = Some(Countdown::arm(now));
        }

        info!(
            phase = next.label(),
            completed = self.completed_sessions,
            running = self.running,
            "pomodoro phase changed"
        );

        if settings.notifications_enabled {
            match notifier.permission() {
                NotificationPermission::Granted => notifier.notify(next),
                NotificationPermission::Default => notifier.request_permission(),
                NotificationPermission::Denied => {}
            }
        }

        next
    }
}

/// Configured length of a phase in seconds (idle shows the work length)
pub fn phase_secs(settings: &PomodoroSettings, phase: PomodoroPhase) -> u32 {
    match phase {
        PomodoroPhase::Work | PomodoroPhase::Idle => settings.work_secs(),
        PomodoroPhase::ShortBreak => settings.short_break_secs(),
        PomodoroPhase::LongBreak => settings.long_break_secs(),
    }
}

/// Format seconds as "MM:SS"
pub fn format_countdown(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingNotifier {
        permission: Option<NotificationPermission>,
        requests: usize,
        sent: Vec<PomodoroPhase>,
    }

    impl Notifier for RecordingNotifier {
        fn permission(&self) -> NotificationPermission {
            self.permission.unwrap_or(NotificationPermission::Granted)
        }

        fn request_permission(&mut self) {
            self.requests += 1;
        }

        fn notify(&mut self, phase: PomodoroPhase) {
            self.sent.push(phase);
        }
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    /// Run the current phase to zero and return the phase that follows
    fn finish_phase(
        engine: &mut PomodoroEngine,
        settings: &PomodoroSettings,
        now: &mut Instant,
        notifier: &mut RecordingNotifier,
    ) -> Option<PomodoroPhase> {
        if !engine.is_running() {
            engine.start(settings, *now);
        }
        *now += secs(engine.remaining_secs() as u64);
        engine.tick(settings, *now, notifier)
    }

    #[test]
    fn test_initial_state() {
        let settings = PomodoroSettings::default();
        let engine = PomodoroEngine::new(&settings);
        assert_eq!(engine.phase(), PomodoroPhase::Idle);
        assert_eq!(engine.remaining_secs(), 25 * 60);
        assert!(!engine.is_running());
        assert_eq!(engine.completed_sessions(), 0);
    }

    #[test]
    fn test_oversized_durations_cap_at_one_day() {
        let settings = PomodoroSettings {
            work_duration: 99_999_999,
            short_break: u32::MAX,
            ..PomodoroSettings::default()
        };
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        assert_eq!(engine.remaining_secs(), 1440 * 60);

        let mut now = Instant::now();
        let next = finish_phase(&mut engine, &settings, &mut now, &mut notifier);
        assert_eq!(next, Some(PomodoroPhase::ShortBreak));
        assert_eq!(engine.remaining_secs(), 1440 * 60);

        engine.reset(&settings);
        assert_eq!(engine.remaining_secs(), 1440 * 60);
    }

    #[test]
    fn test_start_from_idle_enters_work() {
        let settings = PomodoroSettings {
            work_duration: 30,
            ..PomodoroSettings::default()
        };
        let mut engine = PomodoroEngine::new(&PomodoroSettings::default());
        engine.start(&settings, Instant::now());

        assert_eq!(engine.phase(), PomodoroPhase::Work);
        assert_eq!(engine.remaining_secs(), 30 * 60);
        assert!(engine.is_running());
    }

    #[test]
    fn test_tick_decrements_once_per_elapsed_second() {
        let settings = PomodoroSettings::default();
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        let t0 = Instant::now();
        engine.start(&settings, t0);

        // Sub-second ticks don't decrement
        engine.tick(&settings, t0 + Duration::from_millis(250), &mut notifier);
        engine.tick(&settings, t0 + Duration::from_millis(750), &mut notifier);
        assert_eq!(engine.remaining_secs(), 1500);

        engine.tick(&settings, t0 + Duration::from_millis(1250), &mut notifier);
        assert_eq!(engine.remaining_secs(), 1499);

        // Fractional remainder carries over
        engine.tick(&settings, t0 + Duration::from_millis(2000), &mut notifier);
        assert_eq!(engine.remaining_secs(), 1498);

        engine.tick(&settings, t0 + secs(5), &mut notifier);
        assert_eq!(engine.remaining_secs(), 1495);
    }

    #[test]
    fn test_pause_stops_countdown() {
        let settings = PomodoroSettings::default();
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        let t0 = Instant::now();
        engine.start(&settings, t0);
        engine.tick(&settings, t0 + secs(10), &mut notifier);

        engine.pause();
        engine.tick(&settings, t0 + secs(100), &mut notifier);
        assert_eq!(engine.remaining_secs(), 1490);
        assert_eq!(engine.phase(), PomodoroPhase::Work);

        // Resuming re-arms from the resume instant, not the original start
        engine.start(&settings, t0 + secs(100));
        engine.tick(&settings, t0 + secs(103), &mut notifier);
        assert_eq!(engine.remaining_secs(), 1487);
    }

    #[test]
    fn test_start_while_running_does_not_reset_anchor() {
        let settings = PomodoroSettings::default();
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        let t0 = Instant::now();
        engine.start(&settings, t0);
        engine.start(&settings, t0 + Duration::from_millis(900));
        engine.tick(&settings, t0 + Duration::from_millis(1100), &mut notifier);
        assert_eq!(engine.remaining_secs(), 1499);
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let settings = PomodoroSettings::default();
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        let mut now = Instant::now();
        finish_phase(&mut engine, &settings, &mut now, &mut notifier);
        assert_eq!(engine.completed_sessions(), 1);

        engine.reset(&settings);
        assert_eq!(engine.phase(), PomodoroPhase::Idle);
        assert!(!engine.is_running());
        assert_eq!(engine.remaining_secs(), 1500);
        assert_eq!(engine.completed_sessions(), 0);

        engine.tick(&settings, now + secs(60), &mut notifier);
        assert_eq!(engine.remaining_secs(), 1500);
    }

    #[test]
    fn test_long_break_every_interval() {
        let settings = PomodoroSettings::default();
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        let mut now = Instant::now();

        let mut breaks = Vec::new();
        for _ in 0..4 {
            breaks.push(finish_phase(&mut engine, &settings, &mut now, &mut notifier).unwrap());
            assert_eq!(
                finish_phase(&mut engine, &settings, &mut now, &mut notifier),
                Some(PomodoroPhase::Work)
            );
        }

        assert_eq!(
            breaks,
            vec![
                PomodoroPhase::ShortBreak,
                PomodoroPhase::ShortBreak,
                PomodoroPhase::ShortBreak,
                PomodoroPhase::LongBreak,
            ]
        );
        assert_eq!(engine.completed_sessions(), 4);
    }

    #[test]
    fn test_transition_resets_duration_and_stops_without_auto_start() {
        let settings = PomodoroSettings::default();
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        let mut now = Instant::now();

        finish_phase(&mut engine, &settings, &mut now, &mut notifier);
        assert_eq!(engine.phase(), PomodoroPhase::ShortBreak);
        assert_eq!(engine.remaining_secs(), 5 * 60);
        assert!(!engine.is_running());

        // Stays put until resumed
        engine.tick(&settings, now + secs(600), &mut notifier);
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn test_auto_start_flags() {
        let settings = PomodoroSettings {
            auto_start_breaks: true,
            auto_start_pomodoros: false,
            ..PomodoroSettings::default()
        };
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        let mut now = Instant::now();

        finish_phase(&mut engine, &settings, &mut now, &mut notifier);
        assert_eq!(engine.phase(), PomodoroPhase::ShortBreak);
        assert!(engine.is_running());

        now += secs(300);
        assert_eq!(engine.tick(&settings, now, &mut notifier), Some(PomodoroPhase::Work));
        assert!(!engine.is_running());
    }

    #[test]
    fn test_notifications_follow_permission() {
        let settings = PomodoroSettings::default();
        let mut engine = PomodoroEngine::new(&settings);
        let mut now = Instant::now();

        let mut granted = RecordingNotifier::default();
        finish_phase(&mut engine, &settings, &mut now, &mut granted);
        assert_eq!(granted.sent, vec![PomodoroPhase::ShortBreak]);

        let mut undetermined = RecordingNotifier {
            permission: Some(NotificationPermission::Default),
            ..Default::default()
        };
        finish_phase(&mut engine, &settings, &mut now, &mut undetermined);
        assert!(undetermined.sent.is_empty());
        assert_eq!(undetermined.requests, 1);

        let mut denied = RecordingNotifier {
            permission: Some(NotificationPermission::Denied),
            ..Default::default()
        };
        finish_phase(&mut engine, &settings, &mut now, &mut denied);
        assert!(denied.sent.is_empty());
        assert_eq!(denied.requests, 0);
    }

    #[test]
    fn test_notifications_disabled() {
        let settings = PomodoroSettings {
            notifications_enabled: false,
            ..PomodoroSettings::default()
        };
        let mut notifier = RecordingNotifier::default();
        let mut engine = PomodoroEngine::new(&settings);
        let mut now = Instant::now();
        finish_phase(&mut engine, &settings, &mut now, &mut notifier);
        assert!(notifier.sent.is_empty());
    }

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(1500), "25:00");
        assert_eq!(format_countdown(61), "01:01");
        assert_eq!(format_countdown(0), "00:00");
    }
}
