//! Bounds on how long a single action may wait

use std::time::Duration;

/// Shortest wait an action can have, so a completion never re-arms a timer
/// that is already due
pub const MIN_ACTION_DELAY: Duration = Duration::from_millis(1);

/// Longest wait an action can have
pub const MAX_ACTION_DELAY: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Convert a wait in seconds to a `Duration` within the action bounds.
/// Values too large (or not finite) for a `Duration` saturate to the maximum.
pub fn clamp_delay(secs: f64) -> Duration {
    Duration::try_from_secs_f64(secs)
        .unwrap_or(MAX_ACTION_DELAY)
        .clamp(MIN_ACTION_DELAY, MAX_ACTION_DELAY)
}
