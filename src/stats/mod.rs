//! Stats and progress tracking
//!
//! `StatsTracker` is the narrow interface the action loop and effects call
//! into. `ProgressStats` is the stock implementation: lifetime counters,
//! named unlocks, and the per-lifetime one-shot set.

pub mod progress;

pub use progress::{CurrentLifetimeData, ProgressStats, SkillUnlock, Stat, StatCell, StatsData};

use crate::core::types::{NamedUnlock, OneShotId};

pub trait StatsTracker {
    fn unlock(&mut self, unlock: NamedUnlock);

    fn set_one_shot(&mut self, id: &OneShotId);

    fn performed_one_shot(&self, id: &OneShotId) -> bool;

    /// Called once per completed action, after its outcome is published
    fn action_taken(&mut self, zone_name: &str);

    fn critted_action(&mut self);

    fn spell_cast(&mut self) {}

    /// Start of a new lifetime: forget per-lifetime progress
    fn reincarnated(&mut self) {}
}
