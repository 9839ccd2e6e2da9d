//! A currently-executing timed instance of a zone action

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::types::ZoneId;
use crate::timing::clamp_delay;
use crate::zones::zone::{ZoneAction, ZoneActionDescription};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LiveActionId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveStatus {
    Running,
    Completed,
    /// Its zone loop was stopped; the pending timer must do nothing
    Killed,
}

#[derive(Debug)]
struct LiveActionState {
    id: LiveActionId,
    zone: ZoneId,
    action: Arc<ZoneAction>,
    description: ZoneActionDescription,
    delay: Duration,
    slowdown: f64,
    started_at: Instant,
    sp_multiplier: Cell<f64>,
    deadline: Cell<Instant>,
    status: Cell<LiveStatus>,
}

/// Shared handle to a running action.
///
/// The scheduler and any observers (UI, perks) hold clones of the same
/// handle; the scheduler is the only one that changes its status or deadline.
#[derive(Debug, Clone)]
pub struct LiveAction(Rc<LiveActionState>);

impl LiveAction {
    pub(crate) fn new(
        id: LiveActionId,
        zone: ZoneId,
        action: Arc<ZoneAction>,
        description: ZoneActionDescription,
        delay: Duration,
        slowdown: f64,
        now: Instant,
    ) -> Self {
        Self(Rc::new(LiveActionState {
            id,
            zone,
            action,
            description,
            delay,
            slowdown,
            started_at: now,
            sp_multiplier: Cell::new(1.0),
            deadline: Cell::new(now + delay),
            status: Cell::new(LiveStatus::Running),
        }))
    }

    pub fn id(&self) -> LiveActionId {
        self.0.id
    }

    pub fn zone(&self) -> ZoneId {
        self.0.zone
    }

    pub fn action(&self) -> &Arc<ZoneAction> {
        &self.0.action
    }

    /// Present-tense text
    pub fn description(&self) -> &str {
        &self.0.description.present
    }

    pub fn past_description(&self) -> &str {
        &self.0.description.past
    }

    /// Delay computed when the action started
    pub fn delay(&self) -> Duration {
        self.0.delay
    }

    pub fn slowdown(&self) -> f64 {
        self.0.slowdown
    }

    /// Bonus multiplier on this action's own skill points
    pub fn sp_multiplier(&self) -> f64 {
        self.0.sp_multiplier.get()
    }

    pub fn set_sp_multiplier(&self, multiplier: f64) {
        self.0.sp_multiplier.set(multiplier);
    }

    pub fn deadline(&self) -> Instant {
        self.0.deadline.get()
    }

    pub fn status(&self) -> LiveStatus {
        self.0.status.get()
    }

    pub fn is_running(&self) -> bool {
        self.status() == LiveStatus::Running
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        match self.status() {
            LiveStatus::Running => self.deadline().saturating_duration_since(now),
            _ => Duration::ZERO,
        }
    }

    /// Fraction of the wait already done, in [0, 1]
    pub fn progress(&self, now: Instant) -> f64 {
        if self.status() == LiveStatus::Completed {
            return 1.0;
        }
        let total = self.deadline().saturating_duration_since(self.0.started_at);
        if total.is_zero() {
            return 1.0;
        }
        let done = now.saturating_duration_since(self.0.started_at);
        (done.as_secs_f64() / total.as_secs_f64()).min(1.0)
    }

    /// Rescale what is left of the wait by `1 / speedup` and return the new
    /// deadline. Time already spent waiting is kept; the new wait obeys the
    /// same bounds as a freshly started action.
    pub(crate) fn adjust_remaining_time(&self, speedup: f64, now: Instant) -> Instant {
        let remaining = clamp_delay(self.remaining(now).as_secs_f64() / speedup);
        let deadline = now + remaining;
        self.0.deadline.set(deadline);
        deadline
    }

    pub(crate) fn kill(&self) {
        if self.is_running() {
            self.0.status.set(LiveStatus::Killed);
        }
    }

    pub(crate) fn complete(&self) {
        if self.is_running() {
            self.0.status.set(LiveStatus::Completed);
        }
    }
}
