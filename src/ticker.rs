use std::time::{Duration, Instant};

/// Event-loop poll interval. The Pomodoro countdown is anchored to the wall
/// clock, so this only bounds how stale the display can get.
pub const TICK_MS: u64 = 250;

/// How long a status message stays on screen
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(TICK_MS)
}

/// Whether something shown at `shown_at` has outlived the status TTL
pub fn status_expired(shown_at: Instant, now: Instant) -> bool {
    now.saturating_duration_since(shown_at) >= STATUS_TTL
}
