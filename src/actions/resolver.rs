//! Outcome resolution for completed actions
//!
//! Order of operations:
//! 1. Broadcast the proto outcome so perks can add kickers or boost SP
//! 2. Unlock / one-shot bookkeeping declared by the action
//! 3. Engine-level achievements (very slow action, streaks)
//! 4. Crit roll
//! 5. Train the main event, then each kicker

use rand::{Rng, RngCore};

use crate::actions::outcome::{ActionEvent, ActionOutcome, ProtoActionOutcome};
use crate::core::config::{EngineConfig, StreakRule};
use crate::core::types::NamedUnlock;
use crate::events::{Broadcast, SubscriptionId};
use crate::player::PlayerProvider;
use crate::stats::StatsTracker;
use crate::zones::{LiveAction, Zone, ZoneAction};

pub const CRIT_SUFFIX: &str = " CRIT!";

pub struct OutcomeResolver {
    super_slow_threshold: f64,
    streak_rule: StreakRule,
    streak: u32,
    proto_listeners: Broadcast<ProtoActionOutcome>,
}

impl OutcomeResolver {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            super_slow_threshold: config.super_slow_threshold,
            streak_rule: config.streak.clone(),
            streak: 0,
            proto_listeners: Broadcast::new(),
        }
    }

    /// Listen for outcomes in progress. Listeners run synchronously, in
    /// registration order, before anything is trained.
    pub fn on_proto_outcome<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&mut ProtoActionOutcome) + 'static,
    {
        self.proto_listeners.subscribe(listener)
    }

    pub fn remove_proto_listener(&mut self, id: SubscriptionId) -> bool {
        self.proto_listeners.unsubscribe(id)
    }

    /// Current length of the streak counted by the streak rule
    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn resolve(
        &mut self,
        zone: &dyn Zone,
        live: &LiveAction,
        player: &mut dyn PlayerProvider,
        stats: &mut dyn StatsTracker,
        rng: &mut dyn RngCore,
    ) -> ActionOutcome {
        let action = live.action().clone();

        let mut proto = ProtoActionOutcome::new(action.clone(), zone);
        self.proto_listeners.emit(&mut proto);

        if let Some(unlock) = action.unlocks {
            stats.unlock(unlock);
        }
        if let Some(oneshot) = &action.oneshot {
            stats.set_one_shot(oneshot);
        }

        if live.slowdown() > self.super_slow_threshold {
            stats.unlock(NamedUnlock::SuperSlowAction);
        }
        self.track_streak(zone, &action, stats);

        let crit = check_crit(&mut proto, &*player, stats, rng);
        let mut description = live.past_description().to_string();
        if crit {
            description.push_str(CRIT_SUFFIX);
        }

        // The live action's own bonus only applies to the main event
        let main_multiplier = proto.sp_multiplier * live.sp_multiplier();
        let main = ActionEvent {
            description,
            points_gained: Some(player.train_skills(&action.skill_deltas.scaled(main_multiplier))),
        };

        let secondary = proto
            .kickers
            .iter()
            .map(|kicker| ActionEvent {
                description: kicker.description.clone(),
                points_gained: kicker
                    .skill_points
                    .map(|points| player.train_skills(&points.scaled(proto.sp_multiplier))),
            })
            .collect();

        ActionOutcome {
            main,
            secondary,
            crit,
        }
    }

    fn track_streak(&mut self, zone: &dyn Zone, action: &ZoneAction, stats: &mut dyn StatsTracker) {
        let rule = &self.streak_rule;
        if zone.name() == rule.zone && action.skill_deltas[rule.skill] > 0.0 {
            self.streak += 1;
            if self.streak == rule.length {
                stats.unlock(rule.unlock);
            }
        } else {
            self.streak = 0;
        }
    }
}

/// Roll for a crit; on success boost the proto's multiplier once
fn check_crit(
    proto: &mut ProtoActionOutcome,
    player: &dyn PlayerProvider,
    stats: &mut dyn StatsTracker,
    rng: &mut dyn RngCore,
) -> bool {
    let snapshot = player.snapshot();
    if rng.gen::<f64>() < snapshot.crit_chance {
        proto.sp_multiplier *= snapshot.crit_multiplier;
        stats.critted_action();
        stats.unlock(NamedUnlock::FirstCrit);
        true
    } else {
        false
    }
}
