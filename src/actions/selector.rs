//! Action selection with bounded retries

use std::sync::Arc;

use rand::RngCore;

use crate::stats::StatsTracker;
use crate::zones::{Zone, ZoneAction};

#[derive(Debug, Clone)]
pub struct Selection {
    pub action: Arc<ZoneAction>,
    /// Draws made from the zone, including the accepted one
    pub attempts: u32,
    /// Every draw was an already-performed one-shot
    pub exhausted: bool,
}

#[derive(Debug, Clone)]
pub struct ActionSelector {
    max_tries: u32,
}

impl ActionSelector {
    pub fn new(max_tries: u32) -> Self {
        Self {
            max_tries: max_tries.max(1),
        }
    }

    pub fn max_tries(&self) -> u32 {
        self.max_tries
    }

    /// Pick the next action for `zone`, redrawing used one-shots.
    ///
    /// One-shot actions are expected to have low weights. If every draw
    /// comes back as a used one-shot, the last draw is returned anyway.
    pub fn choose(
        &self,
        zone: &dyn Zone,
        stats: &dyn StatsTracker,
        rng: &mut dyn RngCore,
    ) -> Selection {
        let mut action = zone.choose_action(rng);
        let mut attempts = 1;

        while is_spent(&action, stats) && attempts < self.max_tries {
            action = zone.choose_action(rng);
            attempts += 1;
        }

        let exhausted = is_spent(&action, stats);
        if exhausted {
            tracing::error!(
                "Got a used one-shot action every time after {} tries in {}. \
                 Either the zone data is wrong or we got spectacularly unlucky.",
                attempts,
                zone.name()
            );
        }

        Selection {
            action,
            attempts,
            exhausted,
        }
    }
}

fn is_spent(action: &ZoneAction, stats: &dyn StatsTracker) -> bool {
    action
        .oneshot
        .as_ref()
        .map_or(false, |id| stats.performed_one_shot(id))
}
