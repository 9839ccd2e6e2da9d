//! Player collaborator
//!
//! The action loop only needs a read-only snapshot of the player and a way to
//! submit skill training. Leveling math lives with the host.

use serde::{Deserialize, Serialize};

use crate::core::types::SkillMap;

/// What the action loop reads about the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub level: u32,
    pub klass: String,
    /// Probability in [0, 1] that an action crits
    pub crit_chance: f64,
    /// SP multiplier applied on a crit
    pub crit_multiplier: f64,
    pub skills: SkillMap,
}

pub trait PlayerProvider {
    fn snapshot(&self) -> PlayerSnapshot;

    /// Submit skill points; returns the points actually gained, which may
    /// differ from the request (aptitudes, caps)
    fn train_skills(&mut self, deltas: &SkillMap) -> SkillMap;

    /// Mutable crit stats, for effects that boost them
    fn meta_mut(&mut self) -> Option<&mut PlayerMeta> {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerMeta {
    pub crit_chance: f64,
    pub crit_multiplier: f64,
}

impl Default for PlayerMeta {
    fn default() -> Self {
        Self {
            crit_chance: 0.05,
            crit_multiplier: 2.0,
        }
    }
}

/// Basic player: accumulates skill points weighted by class aptitudes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub klass: String,
    pub level: u32,
    pub skills: SkillMap,
    pub aptitudes: SkillMap,
    pub meta: PlayerMeta,
}

impl Player {
    pub fn new(name: impl Into<String>, klass: impl Into<String>, aptitudes: SkillMap) -> Self {
        Self {
            name: name.into(),
            klass: klass.into(),
            level: 1,
            skills: SkillMap::zero(),
            aptitudes,
            meta: PlayerMeta::default(),
        }
    }

    /// Fresh character with the starting class
    pub fn peasant(name: impl Into<String>) -> Self {
        Self::new(name, "Peasant", SkillMap::uniform(0.5))
    }

    pub fn with_meta(mut self, meta: PlayerMeta) -> Self {
        self.meta = meta;
        self
    }
}

impl PlayerProvider for Player {
    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            level: self.level,
            klass: self.klass.clone(),
            crit_chance: self.meta.crit_chance,
            crit_multiplier: self.meta.crit_multiplier,
            skills: self.skills,
        }
    }

    fn train_skills(&mut self, deltas: &SkillMap) -> SkillMap {
        let gained = deltas.weighted(&self.aptitudes);
        self.skills.add_assign(&gained);
        gained
    }

    fn meta_mut(&mut self) -> Option<&mut PlayerMeta> {
        Some(&mut self.meta)
    }
}
