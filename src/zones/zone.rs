//! Zone and action data
//!
//! Zones and their actions are authored elsewhere; the loop only reads them.

use std::fmt;
use std::sync::Arc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, RngCore};

use crate::core::types::{NamedUnlock, OneShotId, SkillMap, ZoneId};
use crate::player::PlayerSnapshot;

/// Flavour text for one action, in both tenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneActionDescription {
    /// Shown while the action runs ("Weeding the turnips")
    pub present: String,
    /// Shown in the log once it completes ("Weeded the turnips")
    pub past: String,
}

impl ZoneActionDescription {
    pub fn new(present: impl Into<String>, past: impl Into<String>) -> Self {
        Self {
            present: present.into(),
            past: past.into(),
        }
    }
}

type SlowdownFn = dyn Fn(&PlayerSnapshot) -> f64 + Send + Sync;

/// A data-defined activity a zone can offer
#[derive(Clone)]
pub struct ZoneAction {
    pub skill_deltas: SkillMap,
    pub unlocks: Option<NamedUnlock>,
    pub oneshot: Option<OneShotId>,
    /// Relative selection weight within the zone
    pub weight: f64,
    descriptions: Vec<ZoneActionDescription>,
    slowdown: Arc<SlowdownFn>,
}

impl ZoneAction {
    pub fn new(skill_deltas: SkillMap, description: ZoneActionDescription) -> Self {
        Self {
            skill_deltas,
            unlocks: None,
            oneshot: None,
            weight: 1.0,
            descriptions: vec![description],
            slowdown: Arc::new(|_| 0.0),
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_unlock(mut self, unlock: NamedUnlock) -> Self {
        self.unlocks = Some(unlock);
        self
    }

    pub fn with_oneshot(mut self, id: OneShotId) -> Self {
        self.oneshot = Some(id);
        self
    }

    /// Extra phrasings; one is picked at random each time the action runs
    pub fn with_description(mut self, description: ZoneActionDescription) -> Self {
        self.descriptions.push(description);
        self
    }

    pub fn with_slowdown<F>(mut self, slowdown: F) -> Self
    where
        F: Fn(&PlayerSnapshot) -> f64 + Send + Sync + 'static,
    {
        self.slowdown = Arc::new(slowdown);
        self
    }

    /// Slowdown that shrinks as the player's skills approach `requirements`:
    /// for each required skill, `max(0, required / (level + 1) - 1)`, summed
    pub fn with_skill_requirements(self, requirements: SkillMap) -> Self {
        self.with_slowdown(move |player| {
            requirements
                .iter()
                .filter(|(_, required)| *required > 0.0)
                .map(|(skill, required)| (required / (player.skills[skill] + 1.0) - 1.0).max(0.0))
                .sum()
        })
    }

    pub fn slowdown(&self, player: &PlayerSnapshot) -> f64 {
        (self.slowdown)(player)
    }

    pub fn choose_description(&self, rng: &mut dyn RngCore) -> ZoneActionDescription {
        let idx = rng.gen_range(0..self.descriptions.len());
        self.descriptions[idx].clone()
    }

    pub fn descriptions(&self) -> &[ZoneActionDescription] {
        &self.descriptions
    }
}

impl fmt::Debug for ZoneAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZoneAction")
            .field("skill_deltas", &self.skill_deltas)
            .field("unlocks", &self.unlocks)
            .field("oneshot", &self.oneshot)
            .field("weight", &self.weight)
            .field("descriptions", &self.descriptions)
            .finish_non_exhaustive()
    }
}

/// A place that offers a weighted set of actions
pub trait Zone: Send + Sync {
    fn zid(&self) -> ZoneId;

    fn name(&self) -> &str;

    /// Weighted-random pick of the next action
    fn choose_action(&self, rng: &mut dyn RngCore) -> Arc<ZoneAction>;
}

impl fmt::Debug for dyn Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Zone({}, {})", self.zid(), self.name())
    }
}

/// Zone backed by a fixed table of weighted actions
#[derive(Debug)]
pub struct WeightedZone {
    zid: ZoneId,
    name: String,
    actions: Vec<Arc<ZoneAction>>,
    weights: WeightedIndex<f64>,
}

impl WeightedZone {
    /// Returns None when there are no actions or the weights are unusable
    /// (all zero, negative, or not finite)
    pub fn new(zid: ZoneId, name: impl Into<String>, actions: Vec<ZoneAction>) -> Option<Self> {
        let weights = WeightedIndex::new(actions.iter().map(|a| a.weight)).ok()?;
        Some(Self {
            zid,
            name: name.into(),
            actions: actions.into_iter().map(Arc::new).collect(),
            weights,
        })
    }

    pub fn actions(&self) -> &[Arc<ZoneAction>] {
        &self.actions
    }
}

impl Zone for WeightedZone {
    fn zid(&self) -> ZoneId {
        self.zid
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn choose_action(&self, rng: &mut dyn RngCore) -> Arc<ZoneAction> {
        let idx = self.weights.sample(rng);
        self.actions[idx].clone()
    }
}
