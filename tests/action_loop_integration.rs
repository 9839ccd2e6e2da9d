//! Action loop integration tests

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use rand::RngCore;

use idle_engine::actions::{ActionOutcome, SecondaryAction, CRIT_SUFFIX};
use idle_engine::core::clock::{Clock, ManualClock};
use idle_engine::core::config::EngineConfig;
use idle_engine::core::types::{NamedUnlock, OneShotId, SkillMap, SkillType, ZoneId};
use idle_engine::engine::Engine;
use idle_engine::player::{Player, PlayerMeta};
use idle_engine::stats::{ProgressStats, Stat, StatsTracker};
use idle_engine::zones::{LiveStatus, WeightedZone, Zone, ZoneAction, ZoneActionDescription};

type TestEngine = Engine<Player, ProgressStats, ManualClock>;

fn config() -> EngineConfig {
    EngineConfig {
        rng_seed: Some(42),
        ..EngineConfig::default()
    }
}

/// Player that gains exactly what it trains and never crits unless told to
fn farmer(crit_chance: f64, crit_multiplier: f64) -> Player {
    Player::new("Test", "Farmer", SkillMap::uniform(1.0)).with_meta(PlayerMeta {
        crit_chance,
        crit_multiplier,
    })
}

fn engine_with(clock: &ManualClock, player: Player) -> TestEngine {
    Engine::new(config(), player, ProgressStats::new(), clock.clone()).unwrap()
}

fn single_action_zone(zid: u32, name: &str, deltas: SkillMap) -> Arc<dyn Zone> {
    Arc::new(
        WeightedZone::new(
            ZoneId(zid),
            name,
            vec![ZoneAction::new(
                deltas,
                ZoneActionDescription::new("Working", "Worked"),
            )],
        )
        .unwrap(),
    )
}

fn turnip_farm() -> Arc<dyn Zone> {
    single_action_zone(1, "Turnip Farm", SkillMap::from_pairs(&[(SkillType::Farming, 10.0)]))
}

/// Hands out its actions in order, wrapping around
struct CyclingZone {
    name: String,
    actions: Vec<Arc<ZoneAction>>,
    next: AtomicUsize,
}

impl CyclingZone {
    fn new(name: &str, actions: Vec<ZoneAction>) -> Self {
        Self {
            name: name.to_string(),
            actions: actions.into_iter().map(Arc::new).collect(),
            next: AtomicUsize::new(0),
        }
    }
}

impl Zone for CyclingZone {
    fn zid(&self) -> ZoneId {
        ZoneId(7)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(&self, _rng: &mut dyn RngCore) -> Arc<ZoneAction> {
        let index = self.next.fetch_add(1, Ordering::SeqCst) % self.actions.len();
        self.actions[index].clone()
    }
}

fn record_outcomes(engine: &mut TestEngine) -> Rc<RefCell<Vec<ActionOutcome>>> {
    let outcomes = Rc::new(RefCell::new(Vec::new()));
    let sink = outcomes.clone();
    engine.on_action_completed(move |info| sink.borrow_mut().push(info.outcome.clone()));
    outcomes
}

/// Step the clock one base delay at a time, firing timers after each step
fn run_actions(engine: &mut TestEngine, clock: &ManualClock, count: usize) {
    for _ in 0..count {
        clock.advance_ms(3000);
        engine.advance();
    }
}

#[test]
fn test_speed_change_rescales_remaining_immediately() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    let outcomes = record_outcomes(&mut engine);

    let live = engine.start_zone(turnip_farm());
    assert_eq!(live.delay(), Duration::from_millis(3000));

    clock.advance_ms(1000);
    assert_eq!(live.remaining(clock.now()), Duration::from_millis(2000));

    engine.set_speed_multiplier(2.0);
    assert_eq!(live.remaining(clock.now()), Duration::from_millis(1000));

    clock.advance_ms(999);
    assert_eq!(engine.advance(), 0);
    clock.advance_ms(1);
    assert_eq!(engine.advance(), 1);
    assert_eq!(outcomes.borrow().len(), 1);

    // The next action starts at the new speed
    let next = engine.current_action(ZoneId(1)).unwrap();
    assert_eq!(next.delay(), Duration::from_millis(1500));
}

#[test]
fn test_starting_second_zone_kills_first() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));

    let first = engine.start_zone(turnip_farm());
    let mill = single_action_zone(2, "Mill", SkillMap::from_pairs(&[(SkillType::Intellect, 1.0)]));
    engine.start_zone(mill);

    assert_eq!(first.status(), LiveStatus::Killed);
    assert!(engine.current_action(ZoneId(1)).is_none());
    assert!(engine.current_action(ZoneId(2)).is_some());
    assert_eq!(engine.pending_timers(), 1);

    run_actions(&mut engine, &clock, 1);

    assert_eq!(engine.stats().actions_taken("Turnip Farm"), 0);
    assert_eq!(engine.stats().actions_taken("Mill"), 1);
}

#[test]
fn test_stopped_zone_never_fires() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    let outcomes = record_outcomes(&mut engine);

    let live = engine.start_zone(turnip_farm());
    assert!(engine.stop_zone(ZoneId(1)));
    assert!(!engine.stop_zone(ZoneId(1)));

    clock.advance_ms(30_000);
    assert_eq!(engine.advance(), 0);

    assert_eq!(live.status(), LiveStatus::Killed);
    assert!(outcomes.borrow().is_empty());
    assert!(engine.current_action(ZoneId(1)).is_none());
}

#[test]
fn test_next_action_is_running_when_outcome_published() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    engine.on_action_completed(move |info| {
        assert!(info.next_action.is_running());
        sink.borrow_mut().push(info.next_action.id());
    });

    engine.start_zone(turnip_farm());
    run_actions(&mut engine, &clock, 3);

    let current = engine.current_action(ZoneId(1)).unwrap();
    assert_eq!(seen.borrow().len(), 3);
    assert_eq!(seen.borrow().last(), Some(&current.id()));
    assert_eq!(engine.stats().actions_taken("Turnip Farm"), 3);
}

#[test]
fn test_late_subscriber_gets_latest_outcome() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    engine.start_zone(turnip_farm());
    run_actions(&mut engine, &clock, 2);

    let outcomes = record_outcomes(&mut engine);

    assert_eq!(outcomes.borrow().len(), 1);
}

#[test]
fn test_late_advance_catches_up() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    engine.start_zone(turnip_farm());

    clock.advance_ms(9500);

    assert_eq!(engine.advance(), 3);
    assert_eq!(engine.stats().actions_taken("Turnip Farm"), 3);
}

#[test]
fn test_live_multiplier_scales_main_event_only() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    let outcomes = record_outcomes(&mut engine);
    engine.on_proto_outcome(|proto| {
        proto.kickers.push(
            SecondaryAction::new("Found a coin")
                .with_skill_points(SkillMap::from_pairs(&[(SkillType::Charm, 1.0)])),
        );
    });

    let live = engine.start_zone(turnip_farm());
    live.set_sp_multiplier(2.0);
    run_actions(&mut engine, &clock, 1);

    let outcomes = outcomes.borrow();
    let outcome = &outcomes[0];
    assert_eq!(outcome.main.description, "Worked");
    assert_eq!(outcome.main.points_gained.unwrap()[SkillType::Farming], 20.0);
    assert_eq!(outcome.secondary.len(), 1);
    assert_eq!(outcome.secondary[0].description, "Found a coin");
    assert_eq!(outcome.secondary[0].points_gained.unwrap()[SkillType::Charm], 1.0);
    assert_eq!(engine.player().skills[SkillType::Farming], 20.0);
}

#[test]
fn test_forced_crit_applies_once_per_resolution() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(1.0, 3.0));
    let outcomes = record_outcomes(&mut engine);
    engine.on_proto_outcome(|proto| {
        proto
            .kickers
            .push(SecondaryAction::new("Bonus").with_skill_points(SkillMap::from_pairs(&[(SkillType::Farming, 1.0)])));
    });

    engine.start_zone(turnip_farm());
    run_actions(&mut engine, &clock, 3);

    let outcomes = outcomes.borrow();
    assert_eq!(outcomes.len(), 3);
    for outcome in outcomes.iter() {
        assert!(outcome.crit);
        assert!(outcome.main.description.ends_with(CRIT_SUFFIX));
        assert_eq!(outcome.main.points_gained.unwrap()[SkillType::Farming], 30.0);
        // Kickers pick up the crit-boosted multiplier too
        assert_eq!(outcome.secondary[0].points_gained.unwrap()[SkillType::Farming], 3.0);
    }
    assert_eq!(engine.stats_mut().current(Stat::CriticalActions), 3);
}

#[test]
fn test_streak_unlocks_on_third_consecutive_action() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    let nest = single_action_zone(3, "Gryphon Nest", SkillMap::from_pairs(&[(SkillType::Stealth, 1.0)]));

    engine.start_zone(nest);
    run_actions(&mut engine, &clock, 2);
    assert!(!engine.stats().unlocked(NamedUnlock::ThreeEggs));

    run_actions(&mut engine, &clock, 1);
    assert!(engine.stats().unlocked(NamedUnlock::ThreeEggs));
}

#[test]
fn test_streak_reset_by_non_matching_action() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    let egg = ZoneAction::new(
        SkillMap::from_pairs(&[(SkillType::Stealth, 1.0)]),
        ZoneActionDescription::new("Stealing an egg", "Stole an egg"),
    );
    let rest = ZoneAction::new(
        SkillMap::from_pairs(&[(SkillType::Survival, 1.0)]),
        ZoneActionDescription::new("Hiding", "Hid"),
    );
    let nest = CyclingZone::new("Gryphon Nest", vec![egg.clone(), egg.clone(), rest, egg.clone(), egg.clone(), egg]);

    engine.start_zone(Arc::new(nest));
    run_actions(&mut engine, &clock, 5);
    assert!(!engine.stats().unlocked(NamedUnlock::ThreeEggs));
    assert_eq!(engine.actions().resolver().streak(), 2);

    run_actions(&mut engine, &clock, 1);
    assert!(engine.stats().unlocked(NamedUnlock::ThreeEggs));
}

#[test]
fn test_performed_oneshot_is_skipped() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    let outcomes = record_outcomes(&mut engine);
    let rescue = ZoneAction::new(
        SkillMap::from_pairs(&[(SkillType::Charm, 1.0)]),
        ZoneActionDescription::new("Freeing the woodsman", "Freed the woodsman"),
    )
    .with_oneshot(OneShotId::new("woodsman"));
    let chop = ZoneAction::new(
        SkillMap::from_pairs(&[(SkillType::Survival, 1.0)]),
        ZoneActionDescription::new("Chopping wood", "Chopped wood"),
    );
    let hut = CyclingZone::new("Woodsman's Hut", vec![rescue.clone(), rescue, chop]);

    let first = engine.start_zone(Arc::new(hut));
    assert_eq!(first.description(), "Freeing the woodsman");

    run_actions(&mut engine, &clock, 1);

    assert!(engine.stats().performed_one_shot(&OneShotId::new("woodsman")));
    assert_eq!(outcomes.borrow()[0].main.description, "Freed the woodsman");
    let next = engine.current_action(ZoneId(7)).unwrap();
    assert_eq!(next.description(), "Chopping wood");
}

#[test]
fn test_super_slow_action_unlock() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    let zone: Arc<dyn Zone> = Arc::new(
        WeightedZone::new(
            ZoneId(4),
            "Library",
            vec![ZoneAction::new(
                SkillMap::from_pairs(&[(SkillType::Intellect, 1.0)]),
                ZoneActionDescription::new("Deciphering a tome", "Deciphered a tome"),
            )
            .with_slowdown(|_| 25.0)],
        )
        .unwrap(),
    );

    let live = engine.start_zone(zone);
    assert_eq!(live.delay(), Duration::from_millis(78_000));

    clock.advance_ms(78_000);
    engine.advance();

    assert!(engine.stats().unlocked(NamedUnlock::SuperSlowAction));
}

#[test]
fn test_same_seed_same_outcomes() {
    let run = || {
        let clock = ManualClock::new();
        let mut engine = engine_with(&clock, farmer(0.5, 2.0));
        let outcomes = record_outcomes(&mut engine);
        engine.start_zone(turnip_farm());
        run_actions(&mut engine, &clock, 10);
        let crits: Vec<bool> = outcomes.borrow().iter().map(|o| o.crit).collect();
        crits
    };

    assert_eq!(run(), run());
}

#[test]
fn test_reincarnate_stops_loop_and_resets_lifetime() {
    let clock = ManualClock::new();
    let mut engine = engine_with(&clock, farmer(0.0, 2.0));
    engine.start_zone(turnip_farm());
    run_actions(&mut engine, &clock, 2);

    engine.reincarnate();

    assert!(engine.active_zone().is_none());
    assert_eq!(engine.pending_timers(), 0);
    assert_eq!(engine.stats_mut().current(Stat::ActionsTaken), 0);
    assert_eq!(engine.stats_mut().lifetime_sum(Stat::ActionsTaken), 2);
    assert_eq!(engine.stats_mut().lifetime_sum(Stat::Reincarnations), 1);
}
