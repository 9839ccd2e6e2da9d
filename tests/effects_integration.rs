//! Timed effects integration tests, driven through the engine

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use idle_engine::core::clock::{Clock, ManualClock};
use idle_engine::core::config::EngineConfig;
use idle_engine::core::types::{SkillMap, SkillType, ZoneId};
use idle_engine::effects::{
    Activation, Buff, BuffEffect, BuffingSpell, Effect, EffectContext, HasteBuff, Spell,
};
use idle_engine::engine::Engine;
use idle_engine::player::Player;
use idle_engine::stats::{ProgressStats, Stat};
use idle_engine::zones::{WeightedZone, Zone, ZoneAction, ZoneActionDescription};
use idle_engine::EngineError;

type TestEngine = Engine<Player, ProgressStats, ManualClock>;

fn new_engine(clock: &ManualClock) -> TestEngine {
    let config = EngineConfig {
        rng_seed: Some(9),
        ..EngineConfig::default()
    };
    Engine::new(config, Player::peasant("Test"), ProgressStats::new(), clock.clone()).unwrap()
}

/// One-second steps, firing timers after each
fn tick_seconds(engine: &mut TestEngine, clock: &ManualClock, seconds: u64) {
    for _ in 0..seconds {
        clock.advance_ms(1000);
        engine.advance();
    }
}

#[derive(Clone, Default)]
struct Counters {
    applied: Rc<Cell<u32>>,
    cleaned: Rc<Cell<u32>>,
}

struct CountingBuff(Counters);

impl BuffEffect for CountingBuff {
    fn on_apply(&mut self, _ctx: &mut EffectContext<'_>) {
        self.0.applied.set(self.0.applied.get() + 1);
    }

    fn clean_up(&mut self, _ctx: &mut EffectContext<'_>) {
        self.0.cleaned.set(self.0.cleaned.get() + 1);
    }
}

fn buff_remaining(engine: &TestEngine, name: &str) -> Option<Duration> {
    match engine.effects().get(name) {
        Some(Effect::Buff(buff)) => Some(buff.remaining()),
        _ => None,
    }
}

fn turnip_farm() -> Arc<dyn Zone> {
    Arc::new(
        WeightedZone::new(
            ZoneId(1),
            "Turnip Farm",
            vec![ZoneAction::new(
                SkillMap::from_pairs(&[(SkillType::Farming, 1.0)]),
                ZoneActionDescription::new("Weeding", "Weeded"),
            )],
        )
        .unwrap(),
    )
}

#[test]
fn test_fruity_refresh_resets_to_full_duration() {
    let clock = ManualClock::new();
    let mut engine = new_engine(&clock);
    let counters = Counters::default();
    let template = counters.clone();
    engine.register_effect_template("Fruity", move || {
        Buff::new("Fruity", Duration::from_secs(10), CountingBuff(template.clone())).into()
    });

    let activation = engine.add_buff("Fruity").unwrap();
    assert!(matches!(activation, Activation::BuffStarted(_)));

    tick_seconds(&mut engine, &clock, 8);
    assert_eq!(buff_remaining(&engine, "Fruity"), Some(Duration::from_millis(2000)));

    let activation = engine.add_buff("Fruity").unwrap();
    assert!(matches!(activation, Activation::Refreshed));
    assert_eq!(buff_remaining(&engine, "Fruity"), Some(Duration::from_millis(10_000)));
    assert_eq!(counters.applied.get(), 1);

    // Refreshing again right away changes nothing
    engine.add_buff("Fruity").unwrap();
    assert_eq!(buff_remaining(&engine, "Fruity"), Some(Duration::from_millis(10_000)));

    tick_seconds(&mut engine, &clock, 10);
    assert_eq!(buff_remaining(&engine, "Fruity"), None);
    assert_eq!(counters.applied.get(), 1);
    assert_eq!(counters.cleaned.get(), 1);
}

#[test]
fn test_haste_rescales_running_action() {
    let clock = ManualClock::new();
    let mut engine = new_engine(&clock);

    let live = engine.start_zone(turnip_farm());
    clock.advance_ms(1000);

    engine.activate(Buff::new("Haste", Duration::from_secs(5), HasteBuff::new(2.0)).into());

    assert_eq!(engine.speed_multiplier(), 2.0);
    assert_eq!(live.remaining(clock.now()), Duration::from_millis(1000));

    // The action and Haste's first check are both due now
    clock.advance_ms(1000);
    assert_eq!(engine.advance(), 2);
    assert_eq!(engine.stats().actions_taken("Turnip Farm"), 1);

    tick_seconds(&mut engine, &clock, 4);
    assert_eq!(engine.speed_multiplier(), 1.0);
}

#[test]
fn test_spell_cooldown_gates_casts() {
    let clock = ManualClock::new();
    let mut engine = new_engine(&clock);
    engine.register_effect_template("Fruity", || {
        Buff::new("Fruity", Duration::from_secs(10), HasteBuff::new(2.0)).into()
    });
    engine.activate(Spell::new("Fruit Snack", Duration::from_secs(30), BuffingSpell::new("Fruity")).into());

    assert!(engine.cast("Fruit Snack").unwrap());
    assert_eq!(engine.speed_multiplier(), 2.0);
    assert_eq!(engine.effects().buffs().len(), 1);

    tick_seconds(&mut engine, &clock, 29);
    assert!(!engine.cast("Fruit Snack").unwrap());
    assert_eq!(engine.speed_multiplier(), 1.0);

    tick_seconds(&mut engine, &clock, 1);
    assert!(engine.cast("Fruit Snack").unwrap());
    assert_eq!(engine.stats_mut().current(Stat::SpellsCast), 2);
}

#[test]
fn test_cast_unknown_spell() {
    let clock = ManualClock::new();
    let mut engine = new_engine(&clock);

    assert!(matches!(engine.cast("Meteor"), Err(EngineError::UnknownEffect(_))));
    assert!(matches!(engine.add_buff("Meteor"), Err(EngineError::UnknownEffect(_))));
}

#[test]
fn test_deactivate_all_then_reincarnate() {
    let clock = ManualClock::new();
    let mut engine = new_engine(&clock);
    let counters = Counters::default();

    engine.start_zone(turnip_farm());
    engine.activate(Buff::new("Haste", Duration::from_secs(60), HasteBuff::new(2.0)).into());
    engine.activate(Buff::new("Fruity", Duration::from_secs(60), CountingBuff(counters.clone())).into());
    assert_eq!(engine.speed_multiplier(), 2.0);

    assert_eq!(engine.deactivate_all(), 2);
    assert_eq!(engine.speed_multiplier(), 1.0);
    assert_eq!(counters.cleaned.get(), 1);
    assert!(engine.effects().buffs().is_empty());

    // Only the action timer is left
    assert_eq!(engine.pending_timers(), 1);

    engine.reincarnate();
    assert!(engine.effects().is_empty());
    assert_eq!(engine.pending_timers(), 0);
    assert_eq!(counters.cleaned.get(), 1);
}
