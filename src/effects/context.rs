//! Collaborators handed to effect callbacks

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::actions::ActionScheduler;
use crate::player::PlayerProvider;
use crate::stats::StatsTracker;
use crate::timing::{TimerEvent, TimerQueue};

/// Everything a spell, buff or passive may touch while it runs
pub struct EffectContext<'a> {
    pub now: Instant,
    /// How often running cooldowns and durations are checked
    pub tick_interval: Duration,
    pub actions: &'a mut ActionScheduler,
    pub timers: &'a mut TimerQueue<TimerEvent>,
    pub player: &'a mut dyn PlayerProvider,
    pub stats: &'a mut dyn StatsTracker,
    requested_buffs: VecDeque<String>,
}

impl<'a> EffectContext<'a> {
    pub fn new(
        now: Instant,
        tick_interval: Duration,
        actions: &'a mut ActionScheduler,
        timers: &'a mut TimerQueue<TimerEvent>,
        player: &'a mut dyn PlayerProvider,
        stats: &'a mut dyn StatsTracker,
    ) -> Self {
        Self {
            now,
            tick_interval,
            actions,
            timers,
            player,
            stats,
            requested_buffs: VecDeque::new(),
        }
    }

    pub fn action_speed(&self) -> f64 {
        self.actions.speed_multiplier()
    }

    /// Rescales the running action immediately
    pub fn set_action_speed(&mut self, value: f64) {
        self.actions.set_speed_multiplier(value, self.now, self.timers);
    }

    /// Ask the registry to activate the catalog buff `name` once the current
    /// callback returns
    pub fn request_buff(&mut self, name: impl Into<String>) {
        self.requested_buffs.push_back(name.into());
    }

    pub(crate) fn next_buff_request(&mut self) -> Option<String> {
        self.requested_buffs.pop_front()
    }

    pub(crate) fn next_check(&self) -> Instant {
        self.now + self.tick_interval
    }
}
