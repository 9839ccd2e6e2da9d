//! Wall-clock countdown shared by spell cooldowns and buff durations
//!
//! A countdown does not own a timer itself. Whoever runs it arms a periodic
//! check and calls `tick(now)`; each tick subtracts the real time elapsed
//! since the previous one, so late or skipped checks never stretch the
//! countdown.

use std::time::{Duration, Instant};

/// Result of a periodic check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// Still counting; re-arm the check
    Running(Duration),
    /// Reached zero on this tick; the countdown is Ready again
    Expired,
    /// Not running (stale check)
    Idle,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    duration: Duration,
    remaining: Duration,
    /// Set while running
    last_tick: Option<Instant>,
    /// Bumped on every start and stop so checks armed earlier can be told apart
    generation: u64,
}

impl Countdown {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            remaining: Duration::ZERO,
            last_tick: None,
            generation: 0,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Remaining time as of the last tick
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.last_tick.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ready -> Running with the full duration. Returns the new generation.
    pub fn start(&mut self, now: Instant) -> u64 {
        self.remaining = self.duration;
        self.last_tick = Some(now);
        self.generation += 1;
        self.generation
    }

    pub fn tick(&mut self, now: Instant) -> CountdownTick {
        let Some(last) = self.last_tick else {
            return CountdownTick::Idle;
        };

        let elapsed = now.saturating_duration_since(last);
        self.remaining = self.remaining.saturating_sub(elapsed);

        if self.remaining.is_zero() {
            self.last_tick = None;
            CountdownTick::Expired
        } else {
            self.last_tick = Some(now);
            CountdownTick::Running(self.remaining)
        }
    }

    /// Reset a running countdown to its full duration.
    ///
    /// Keeps the generation, so the already-armed check stays valid.
    /// Returns false (and does nothing) when not running.
    pub fn refresh(&mut self, now: Instant) -> bool {
        if !self.is_running() {
            return false;
        }
        self.remaining = self.duration;
        self.last_tick = Some(now);
        true
    }

    /// Force back to Ready. Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        let was_running = self.is_running();
        self.remaining = Duration::ZERO;
        self.last_tick = None;
        self.generation += 1;
        was_running
    }
}
