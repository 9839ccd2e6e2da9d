//! Idle Engine - Demo
//!
//! Runs the action loop in a small demo zone on the tokio driver and prints
//! every outcome as it completes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use idle_engine::actions::PostActionInfo;
use idle_engine::core::clock::TokioClock;
use idle_engine::core::config::EngineConfig;
use idle_engine::core::error::{EngineError, Result};
use idle_engine::core::types::{OneShotId, SkillMap, SkillType, ZoneId};
use idle_engine::effects::{Buff, BuffingSpell, CritPassive, HasteBuff, Passive, Spell};
use idle_engine::engine::{driver, Engine};
use idle_engine::player::Player;
use idle_engine::stats::ProgressStats;
use idle_engine::zones::{WeightedZone, Zone, ZoneAction, ZoneActionDescription};

/// Idle Engine demo - watch a peasant work the turnip farm
#[derive(Parser, Debug)]
#[command(name = "idle-engine")]
#[command(about = "Run the idle action loop in a demo zone")]
struct Args {
    /// How long to run, in seconds
    #[arg(long, default_value_t = 30)]
    seconds: u64,

    /// Action speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Engine config (TOML); defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Cast Fruit Snack as soon as the loop starts
    #[arg(long)]
    fruity: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("idle_engine=debug")
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }

    // The engine is single-threaded, so it stays on one runtime thread
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(run_demo(config, args))
}

async fn run_demo(config: EngineConfig, args: Args) -> Result<()> {
    let mut engine = Engine::new(config, Player::peasant("Hero"), ProgressStats::new(), TokioClock)?;

    engine.register_effect_template("Fruity", || {
        Buff::new("Fruity", Duration::from_secs(10), HasteBuff::new(2.0))
            .with_description("Actions are twice as fast")
            .into()
    });
    engine.activate(
        Spell::new("Fruit Snack", Duration::from_secs(30), BuffingSpell::new("Fruity"))
            .with_description("Eat something fruity")
            .into(),
    );
    engine.activate(
        Passive::new("Keen Eye", CritPassive::new(0.05))
            .with_description("Crit chance +5%")
            .into(),
    );

    engine.on_action_completed(print_outcome);

    let (handle, commands) = driver::channel();
    handle.start_zone(turnip_farm()?);
    if args.speed != 1.0 {
        handle.set_speed(args.speed);
    }
    if args.fruity {
        handle.cast("Fruit Snack");
    }

    let stop = async {
        tokio::time::sleep(Duration::from_secs(args.seconds)).await;
        handle.shutdown();
    };
    tokio::join!(driver::run(&mut engine, commands), stop);

    println!();
    println!("=== AFTER {}s ===", args.seconds);
    println!("Actions taken: {}", engine.stats().actions_taken("Turnip Farm"));
    for (skill, points) in engine.player().skills.iter() {
        if points > 0.0 {
            println!("  {:?}: {:.2}", skill, points);
        }
    }

    Ok(())
}

fn print_outcome(info: &PostActionInfo) {
    let main = &info.outcome.main;
    match &main.points_gained {
        Some(points) => println!("{} (+{:.2} sp)", main.description, points.total()),
        None => println!("{}", main.description),
    }
    for secondary in &info.outcome.secondary {
        println!("  {}", secondary.description);
    }
    println!("  next: {}", info.next_action.description());
}

fn turnip_farm() -> Result<Arc<dyn Zone>> {
    let actions = vec![
        ZoneAction::new(
            SkillMap::from_pairs(&[(SkillType::Farming, 1.0)]),
            ZoneActionDescription::new("Picking turnips", "Picked turnips"),
        )
        .with_description(ZoneActionDescription::new("Pulling weeds", "Pulled weeds"))
        .with_weight(10.0),
        ZoneAction::new(
            SkillMap::from_pairs(&[(SkillType::Farming, 0.5), (SkillType::Combat, 0.5)]),
            ZoneActionDescription::new("Chasing crows", "Chased off the crows"),
        )
        .with_weight(4.0)
        .with_skill_requirements(SkillMap::from_pairs(&[(SkillType::Combat, 2.0)])),
        ZoneAction::new(
            SkillMap::from_pairs(&[(SkillType::Intellect, 2.0)]),
            ZoneActionDescription::new("Building a scarecrow", "Built a scarecrow"),
        )
        .with_weight(0.5)
        .with_oneshot(OneShotId::new("turnip-farm-scarecrow")),
    ];

    let zone = WeightedZone::new(ZoneId(1), "Turnip Farm", actions)
        .ok_or_else(|| EngineError::InvalidConfig("demo zone has no usable actions".into()))?;
    Ok(Arc::new(zone))
}
