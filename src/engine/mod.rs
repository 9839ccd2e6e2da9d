//! Engine: one action loop, one effect registry, one timer queue
//!
//! The engine is single-threaded and never blocks. `advance()` fires every
//! timer that is due according to the clock; something outside (the tokio
//! driver, a test, a game loop) decides when to call it.

pub mod driver;

use std::sync::Arc;
use std::time::Instant;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::actions::{
    ActionScheduler, LoopEnv, PostActionInfo, ProtoActionOutcome,
};
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::EngineConfig;
use crate::core::error::Result;
use crate::core::types::ZoneId;
use crate::effects::{Activation, Effect, EffectContext, EffectRegistry};
use crate::events::SubscriptionId;
use crate::player::{Player, PlayerProvider};
use crate::stats::{ProgressStats, StatsTracker};
use crate::timing::{TimerEvent, TimerQueue};
use crate::zones::{LiveAction, Zone};

pub use driver::{EngineCommand, EngineHandle};

pub struct Engine<P = Player, S = ProgressStats, C = SystemClock> {
    config: EngineConfig,
    clock: C,
    rng: Box<dyn RngCore>,
    timers: TimerQueue<TimerEvent>,
    actions: ActionScheduler,
    effects: EffectRegistry,
    player: P,
    stats: S,
}

impl<P, S, C> Engine<P, S, C>
where
    P: PlayerProvider,
    S: StatsTracker,
    C: Clock,
{
    pub fn new(config: EngineConfig, player: P, stats: S, clock: C) -> Result<Self> {
        config.validate()?;

        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            actions: ActionScheduler::new(&config),
            config,
            clock,
            rng: Box::new(rng),
            timers: TimerQueue::new(),
            effects: EffectRegistry::new(),
            player,
            stats,
        })
    }

    /// Replace the random source (selection, descriptions and crit rolls)
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    // === ACTION LOOP ===

    /// Make `zone` the active zone and start its first action
    pub fn start_zone(&mut self, zone: Arc<dyn Zone>) -> LiveAction {
        let now = self.clock.now();
        let (actions, mut env) = self.loop_parts(now);
        actions.start(zone, &mut env)
    }

    pub fn stop_zone(&mut self, zone: ZoneId) -> bool {
        self.actions.stop(zone, &mut self.timers)
    }

    pub fn stop_all(&mut self) -> bool {
        self.actions.stop_all(&mut self.timers)
    }

    pub fn current_action(&self, zone: ZoneId) -> Option<LiveAction> {
        self.actions.current(zone)
    }

    pub fn active_zone(&self) -> Option<&Arc<dyn Zone>> {
        self.actions.active_zone()
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.actions.speed_multiplier()
    }

    /// Panics if `value` is not positive.
    pub fn set_speed_multiplier(&mut self, value: f64) {
        let now = self.clock.now();
        self.actions.set_speed_multiplier(value, now, &mut self.timers);
    }

    pub fn set_inexperience_multiplier(&mut self, value: f64) {
        self.actions.set_inexperience_multiplier(value);
    }

    pub fn on_action_completed<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&PostActionInfo) + 'static,
    {
        self.actions.on_action_completed(subscriber)
    }

    pub fn on_proto_outcome<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&mut ProtoActionOutcome) + 'static,
    {
        self.actions.resolver_mut().on_proto_outcome(listener)
    }

    // === EFFECTS ===

    pub fn register_effect_template<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Effect + 'static,
    {
        self.effects.register_template(name, factory);
    }

    pub fn activate(&mut self, effect: Effect) -> Activation {
        let now = self.clock.now();
        let (effects, mut ctx) = self.effect_parts(now);
        effects.activate(effect, &mut ctx)
    }

    pub fn add_buff(&mut self, name: &str) -> Result<Activation> {
        let now = self.clock.now();
        let (effects, mut ctx) = self.effect_parts(now);
        effects.add_buff(name, &mut ctx)
    }

    pub fn cast(&mut self, name: &str) -> Result<bool> {
        let now = self.clock.now();
        let (effects, mut ctx) = self.effect_parts(now);
        effects.cast(name, &mut ctx)
    }

    pub fn deactivate_all(&mut self) -> usize {
        let now = self.clock.now();
        let (effects, mut ctx) = self.effect_parts(now);
        effects.deactivate_all(&mut ctx)
    }

    /// Start a new lifetime: stop the loop, drop every effect, reset
    /// per-lifetime stats
    pub fn reincarnate(&mut self) {
        self.stop_all();

        let now = self.clock.now();
        let (effects, mut ctx) = self.effect_parts(now);
        effects.clear(&mut ctx);

        self.stats.reincarnated();
        tracing::info!("Reincarnated");
    }

    // === TIMERS ===

    /// Fire every timer that is due, in deadline order. Each one is handled
    /// as of its own deadline, so a late call catches up instead of
    /// stretching the loop. Returns how many timers did something.
    pub fn advance(&mut self) -> usize {
        let now = self.clock.now();
        let mut fired = 0;

        while let Some((_, at, event)) = self.timers.pop_due(now) {
            if self.dispatch(event, at) {
                fired += 1;
            }
        }
        fired
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn dispatch(&mut self, event: TimerEvent, at: Instant) -> bool {
        match event {
            TimerEvent::ActionDue(id) => {
                let (actions, mut env) = self.loop_parts(at);
                actions.on_action_due(id, &mut env)
            }
            TimerEvent::EffectTick { name, generation } => {
                let (effects, mut ctx) = self.effect_parts(at);
                effects.on_tick(&name, generation, &mut ctx)
            }
        }
    }

    // === ACCESSORS ===

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    pub fn stats(&self) -> &S {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut S {
        &mut self.stats
    }

    pub fn actions(&self) -> &ActionScheduler {
        &self.actions
    }

    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    // === BORROW SPLITTING ===

    fn loop_parts(&mut self, now: Instant) -> (&mut ActionScheduler, LoopEnv<'_>) {
        (
            &mut self.actions,
            LoopEnv {
                now,
                timers: &mut self.timers,
                player: &mut self.player,
                stats: &mut self.stats,
                rng: &mut *self.rng,
            },
        )
    }

    fn effect_parts(&mut self, now: Instant) -> (&mut EffectRegistry, EffectContext<'_>) {
        (
            &mut self.effects,
            EffectContext::new(
                now,
                self.config.effect_tick_interval(),
                &mut self.actions,
                &mut self.timers,
                &mut self.player,
                &mut self.stats,
            ),
        )
    }
}
