//! The self-perpetuating action loop
//!
//! One zone at a time is active. Each iteration picks an action, arms a
//! one-shot timer for its delay, and when the timer fires resolves the
//! outcome, starts the next iteration, and only then publishes the outcome
//! together with the action that is now running.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::RngCore;

use crate::actions::outcome::PostActionInfo;
use crate::actions::resolver::OutcomeResolver;
use crate::actions::selector::ActionSelector;
use crate::core::config::EngineConfig;
use crate::core::types::ZoneId;
use crate::events::{ReplayChannel, SubscriptionId};
use crate::player::{PlayerProvider, PlayerSnapshot};
use crate::stats::StatsTracker;
use crate::timing::{clamp_delay, TimerEvent, TimerId, TimerQueue};
use crate::zones::{LiveAction, LiveActionId, Zone, ZoneAction};

/// Everything one loop step needs besides the scheduler itself
pub struct LoopEnv<'a> {
    pub now: Instant,
    pub timers: &'a mut TimerQueue<TimerEvent>,
    pub player: &'a mut dyn PlayerProvider,
    pub stats: &'a mut dyn StatsTracker,
    pub rng: &'a mut dyn RngCore,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayCalc {
    pub delay: Duration,
    pub slowdown: f64,
}

struct ActiveLoop {
    zone: Arc<dyn Zone>,
    action: LiveAction,
    timer: TimerId,
}

pub struct ActionScheduler {
    base_zone_delay: Duration,
    speed_multiplier: f64,
    inexperience_multiplier: f64,
    selector: ActionSelector,
    resolver: OutcomeResolver,
    active: Option<ActiveLoop>,
    next_action_id: u64,
    completed: ReplayChannel<PostActionInfo>,
}

impl ActionScheduler {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            base_zone_delay: config.base_zone_delay(),
            speed_multiplier: 1.0,
            inexperience_multiplier: 1.0,
            selector: ActionSelector::new(config.selector_max_tries),
            resolver: OutcomeResolver::new(config),
            active: None,
            next_action_id: 0,
            completed: ReplayChannel::new(),
        }
    }

    // === ACTION BOOKKEEPING ===

    /// Stop whatever zone is running, make `zone` active and start its first
    /// action
    pub fn start(&mut self, zone: Arc<dyn Zone>, env: &mut LoopEnv<'_>) -> LiveAction {
        self.stop_all(env.timers);
        tracing::info!("Starting action loop in {}", zone.name());

        let (action, timer) = self.begin_iteration(zone.as_ref(), env);
        self.active = Some(ActiveLoop {
            zone,
            action: action.clone(),
            timer,
        });
        action
    }

    /// Kill the running action and stop looping, if `zone` is the active one
    pub fn stop(&mut self, zone: ZoneId, timers: &mut TimerQueue<TimerEvent>) -> bool {
        match &self.active {
            Some(active) if active.zone.zid() == zone => {}
            _ => return false,
        }
        self.stop_all(timers)
    }

    pub fn stop_all(&mut self, timers: &mut TimerQueue<TimerEvent>) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        tracing::info!("Stopping action loop in {}", active.zone.name());
        active.action.kill();
        timers.cancel(active.timer);
        true
    }

    /// The running action, if `zone` is the active zone
    pub fn current(&self, zone: ZoneId) -> Option<LiveAction> {
        self.active
            .as_ref()
            .filter(|active| active.zone.zid() == zone)
            .map(|active| active.action.clone())
    }

    pub fn active_zone(&self) -> Option<&Arc<dyn Zone>> {
        self.active.as_ref().map(|active| &active.zone)
    }

    pub fn current_action(&self) -> Option<&LiveAction> {
        self.active.as_ref().map(|active| &active.action)
    }

    // === SPEED ===

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    /// Change action speed. The running action keeps the time it has
    /// already waited; only what remains is rescaled.
    ///
    /// Panics if `value` is not positive.
    pub fn set_speed_multiplier(
        &mut self,
        value: f64,
        now: Instant,
        timers: &mut TimerQueue<TimerEvent>,
    ) {
        assert!(
            value > 0.0 && self.speed_multiplier > 0.0,
            "action speed multiplier must stay positive (was {}, requested {})",
            self.speed_multiplier,
            value
        );
        let speedup = value / self.speed_multiplier;

        if let Some(active) = self.active.as_mut() {
            let deadline = active.action.adjust_remaining_time(speedup, now);
            timers.cancel(active.timer);
            active.timer = timers.schedule(deadline, TimerEvent::ActionDue(active.action.id()));
        }
        self.speed_multiplier = value;
    }

    pub fn inexperience_multiplier(&self) -> f64 {
        self.inexperience_multiplier
    }

    /// Scales the slowdown of every action started from now on
    pub fn set_inexperience_multiplier(&mut self, value: f64) {
        self.inexperience_multiplier = value;
    }

    // === EVENTS ===

    /// Subscribe to completed actions. The most recent completion, if any,
    /// is delivered immediately.
    pub fn on_action_completed<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&PostActionInfo) + 'static,
    {
        self.completed.subscribe(subscriber)
    }

    pub fn remove_completion_subscriber(&mut self, id: SubscriptionId) -> bool {
        self.completed.unsubscribe(id)
    }

    pub fn last_completed(&self) -> Option<&PostActionInfo> {
        self.completed.latest()
    }

    pub fn resolver(&self) -> &OutcomeResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut OutcomeResolver {
        &mut self.resolver
    }

    // === LOOP ===

    /// Handle a fired action timer. Returns false when the timer belongs to
    /// an action that was killed or replaced.
    pub fn on_action_due(&mut self, id: LiveActionId, env: &mut LoopEnv<'_>) -> bool {
        let Some(active) = self.active.as_ref() else {
            return false;
        };
        if active.action.id() != id || !active.action.is_running() {
            tracing::debug!("Ignoring stale action timer {:?}", id);
            return false;
        }

        let zone = active.zone.clone();
        let finished = active.action.clone();
        finished.complete();

        let outcome = self.resolver.resolve(
            zone.as_ref(),
            &finished,
            &mut *env.player,
            &mut *env.stats,
            &mut *env.rng,
        );

        let (next_action, timer) = self.begin_iteration(zone.as_ref(), env);
        self.active = Some(ActiveLoop {
            zone: zone.clone(),
            action: next_action.clone(),
            timer,
        });

        self.completed.publish(PostActionInfo {
            outcome,
            next_action,
        });
        env.stats.action_taken(zone.name());
        true
    }

    fn begin_iteration(&mut self, zone: &dyn Zone, env: &mut LoopEnv<'_>) -> (LiveAction, TimerId) {
        let selection = self.selector.choose(zone, &*env.stats, &mut *env.rng);
        let description = selection.action.choose_description(&mut *env.rng);
        let calc = self.delay_for(&selection.action, &env.player.snapshot());

        let id = LiveActionId(self.next_action_id);
        self.next_action_id += 1;

        let action = LiveAction::new(
            id,
            zone.zid(),
            selection.action,
            description,
            calc.delay,
            calc.slowdown,
            env.now,
        );
        let timer = env.timers.schedule(action.deadline(), TimerEvent::ActionDue(id));
        (action, timer)
    }

    // === ACTION MECHANICS ===

    pub fn delay_for(&self, action: &ZoneAction, player: &PlayerSnapshot) -> DelayCalc {
        let slowdown = action.slowdown(player) * self.inexperience_multiplier;
        let factor = (slowdown + 1.0).max(0.0);

        let skill_adjusted = clamp_delay(self.base_zone_delay.as_secs_f64() * factor);
        let buffed = clamp_delay(skill_adjusted.as_secs_f64() / self.speed_multiplier);
        if buffed != skill_adjusted {
            tracing::debug!("Delay buffed: {:?} -> {:?}", skill_adjusted, buffed);
        }

        DelayCalc {
            delay: buffed,
            slowdown,
        }
    }
}
