//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// Identifier of a zone (a place that offers actions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneId(pub u32);

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "zone#{}", self.0)
    }
}

/// Trainable skills
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillType {
    Farming,
    Combat,
    Stealth,
    Survival,
    Riding,
    Piety,
    Intellect,
    Charm,
}

impl SkillType {
    pub const COUNT: usize = 8;

    pub const ALL: [SkillType; SkillType::COUNT] = [
        SkillType::Farming,
        SkillType::Combat,
        SkillType::Stealth,
        SkillType::Survival,
        SkillType::Riding,
        SkillType::Piety,
        SkillType::Intellect,
        SkillType::Charm,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// One number per skill (deltas, levels, aptitudes, points gained)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillMap([f64; SkillType::COUNT]);

impl SkillMap {
    pub fn zero() -> Self {
        Self([0.0; SkillType::COUNT])
    }

    pub fn uniform(value: f64) -> Self {
        Self([value; SkillType::COUNT])
    }

    /// Build a map from (skill, value) pairs; unlisted skills are zero
    pub fn from_pairs(pairs: &[(SkillType, f64)]) -> Self {
        let mut map = Self::zero();
        for (skill, value) in pairs {
            map[*skill] = *value;
        }
        map
    }

    /// Same as `from_pairs` but unlisted skills get `default`
    pub fn mostly_uniform(default: f64, overrides: &[(SkillType, f64)]) -> Self {
        let mut map = Self::uniform(default);
        for (skill, value) in overrides {
            map[*skill] = *value;
        }
        map
    }

    pub fn get(&self, skill: SkillType) -> f64 {
        self.0[skill.index()]
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        let mut out = *self;
        for v in out.0.iter_mut() {
            *v = f(*v);
        }
        out
    }

    pub fn scaled(&self, multiplier: f64) -> Self {
        self.map(|v| v * multiplier)
    }

    /// Element-wise product
    pub fn weighted(&self, weights: &SkillMap) -> Self {
        let mut out = *self;
        for (v, w) in out.0.iter_mut().zip(weights.0.iter()) {
            *v *= w;
        }
        out
    }

    pub fn add_assign(&mut self, other: &SkillMap) {
        for (v, o) in self.0.iter_mut().zip(other.0.iter()) {
            *v += o;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkillType, f64)> + '_ {
        SkillType::ALL.iter().map(move |s| (*s, self.get(*s)))
    }

    /// Skills with a non-zero entry
    pub fn truthy_skills(&self) -> Vec<SkillType> {
        self.iter().filter(|(_, v)| *v != 0.0).map(|(s, _)| s).collect()
    }

    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

impl Default for SkillMap {
    fn default() -> Self {
        Self::zero()
    }
}

impl Index<SkillType> for SkillMap {
    type Output = f64;

    fn index(&self, skill: SkillType) -> &f64 {
        &self.0[skill.index()]
    }
}

impl IndexMut<SkillType> for SkillMap {
    fn index_mut(&mut self, skill: SkillType) -> &mut f64 {
        &mut self.0[skill.index()]
    }
}

/// Achievements tracked by the stats collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedUnlock {
    /// Completed an action with a huge inexperience slowdown
    SuperSlowAction,
    /// Stole three gryphon eggs in a row
    ThreeEggs,
    /// Finished an action that was boosted by a critical hit
    FirstCrit,
    /// Cast any spell
    FirstSpell,
}

impl NamedUnlock {
    pub const ALL: [NamedUnlock; 4] = [
        NamedUnlock::SuperSlowAction,
        NamedUnlock::ThreeEggs,
        NamedUnlock::FirstCrit,
        NamedUnlock::FirstSpell,
    ];
}

/// Identifier of an action that can be performed at most once per lifetime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OneShotId(pub String);

impl OneShotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for OneShotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
