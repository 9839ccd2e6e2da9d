//! Stock stats tracker

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{NamedUnlock, OneShotId, SkillMap, SkillType};
use crate::stats::StatsTracker;

/// Simple counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    PlayerLevel,
    SpellsCast,
    CriticalActions,
    Clicks,
    ActionsTaken,
    Reincarnations,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::PlayerLevel,
        Stat::SpellsCast,
        Stat::CriticalActions,
        Stat::Clicks,
        Stat::ActionsTaken,
        Stat::Reincarnations,
    ];
}

/// Counter for the current lifetime plus the all-time sum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatCell {
    pub current: u64,
    pub sum: u64,
}

impl StatCell {
    fn increment(&mut self) {
        self.current += 1;
        self.sum += 1;
    }
}

/// Where the player stands against a skill-gated unlock
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkillUnlock {
    /// The lifetime best already meets the threshold
    Reached,
    /// Fraction of the threshold reached this lifetime, in [0, 1)
    Progress(f64),
}

/// Progress that resets on reincarnation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentLifetimeData {
    pub one_shots: AHashSet<OneShotId>,
    pub skill_levels: SkillMap,
    pub zone_levels: AHashMap<String, u32>,
}

/// Everything the tracker knows; serializable as a whole
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsData {
    pub simple_stats: AHashMap<Stat, StatCell>,
    pub unlocks: AHashSet<NamedUnlock>,
    pub klass_levels: AHashMap<String, u32>,
    /// Lifetime-max skill levels
    pub skill_levels: SkillMap,
    /// Per-zone action counts, keyed by zone name
    pub action_stats: AHashMap<String, StatCell>,
    pub current: CurrentLifetimeData,
}

impl StatsData {
    pub fn fresh() -> Self {
        let mut data = Self::default();
        for stat in Stat::ALL {
            data.simple_stats.insert(stat, StatCell::default());
        }
        data.klass_levels.insert("Peasant".to_string(), 0);
        data
    }
}

#[derive(Debug, Clone)]
pub struct ProgressStats {
    data: StatsData,
}

impl ProgressStats {
    pub fn new() -> Self {
        Self {
            data: StatsData::fresh(),
        }
    }

    /// Wrap previously saved data. Cells missing from older snapshots are
    /// filled in on first access.
    pub fn from_data(data: StatsData) -> Self {
        Self { data }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let data: StatsData = serde_json::from_str(json)?;
        Ok(Self::from_data(data))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.data)?)
    }

    pub fn data(&self) -> &StatsData {
        &self.data
    }

    // === WRITE ===

    pub fn clicked(&mut self) {
        self.cell_mut(Stat::Clicks).increment();
    }

    /// Record the current level. Class-level maxima only ever go up.
    pub fn set_level(&mut self, level: u32, klass: &str) {
        let cell = self.cell_mut(Stat::PlayerLevel);
        let level = u64::from(level);
        cell.sum = (cell.sum + level).saturating_sub(cell.current);
        cell.current = level;

        let best = self.data.klass_levels.entry(klass.to_string()).or_insert(0);
        *best = (*best).max(level as u32);
    }

    pub fn set_skills(&mut self, levels: &SkillMap) {
        self.data.current.skill_levels = *levels;
        for skill in SkillType::ALL {
            let best = &mut self.data.skill_levels[skill];
            *best = best.max(levels[skill]);
        }
    }

    pub fn leveled_zone(&mut self, zone_name: &str, to_level: u32) {
        self.data
            .current
            .zone_levels
            .insert(zone_name.to_string(), to_level);
    }

    // === READ ===

    /// Current-lifetime value of a counter
    pub fn current(&mut self, stat: Stat) -> u64 {
        self.cell_mut(stat).current
    }

    pub fn lifetime_sum(&mut self, stat: Stat) -> u64 {
        self.cell_mut(stat).sum
    }

    pub fn unlocked(&self, unlock: NamedUnlock) -> bool {
        self.data.unlocks.contains(&unlock)
    }

    pub fn actions_taken(&self, zone_name: &str) -> u64 {
        self.data
            .action_stats
            .get(zone_name)
            .map(|c| c.current)
            .unwrap_or(0)
    }

    pub fn lifetime_actions_taken(&self, zone_name: &str) -> u64 {
        self.data
            .action_stats
            .get(zone_name)
            .map(|c| c.sum)
            .unwrap_or(0)
    }

    pub fn best_level(&self, klass: &str) -> u32 {
        self.data.klass_levels.get(klass).copied().unwrap_or(0)
    }

    pub fn skill_level(&self, skill: SkillType) -> f64 {
        self.data.skill_levels[skill]
    }

    pub fn check_skill_unlock(&self, skill: SkillType, threshold: f64) -> SkillUnlock {
        if self.data.skill_levels[skill] >= threshold {
            SkillUnlock::Reached
        } else {
            SkillUnlock::Progress(self.data.current.skill_levels[skill] / threshold)
        }
    }

    fn cell_mut(&mut self, stat: Stat) -> &mut StatCell {
        if !self.data.simple_stats.contains_key(&stat) {
            tracing::warn!(
                "Couldn't find {:?} in saved stats. Save version mismatch? Adding an empty cell for it.",
                stat
            );
        }
        self.data.simple_stats.entry(stat).or_default()
    }
}

impl Default for ProgressStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsTracker for ProgressStats {
    fn unlock(&mut self, unlock: NamedUnlock) {
        if self.data.unlocks.insert(unlock) {
            tracing::info!("New named unlock! {:?}", unlock);
        }
    }

    fn set_one_shot(&mut self, id: &OneShotId) {
        self.data.current.one_shots.insert(id.clone());
    }

    fn performed_one_shot(&self, id: &OneShotId) -> bool {
        self.data.current.one_shots.contains(id)
    }

    fn action_taken(&mut self, zone_name: &str) {
        self.cell_mut(Stat::ActionsTaken).increment();
        self.data
            .action_stats
            .entry(zone_name.to_string())
            .or_default()
            .increment();
    }

    fn critted_action(&mut self) {
        self.cell_mut(Stat::CriticalActions).increment();
    }

    fn spell_cast(&mut self) {
        self.cell_mut(Stat::SpellsCast).increment();
    }

    fn reincarnated(&mut self) {
        self.cell_mut(Stat::Reincarnations).increment();

        self.data.current = CurrentLifetimeData::default();
        for cell in self.data.simple_stats.values_mut() {
            cell.current = 0;
        }
        for cell in self.data.action_stats.values_mut() {
            cell.current = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_counts_per_zone() {
        let mut stats = ProgressStats::new();
        stats.action_taken("Turnip Farm");
        stats.action_taken("Turnip Farm");
        stats.action_taken("Gryphon Nest");

        assert_eq!(stats.actions_taken("Turnip Farm"), 2);
        assert_eq!(stats.actions_taken("Gryphon Nest"), 1);
        assert_eq!(stats.actions_taken("Nowhere"), 0);
        assert_eq!(stats.current(Stat::ActionsTaken), 3);
    }

    #[test]
    fn test_reincarnation_keeps_lifetime_sums() {
        let mut stats = ProgressStats::new();
        stats.critted_action();
        stats.set_one_shot(&OneShotId::new("free-woodsman"));
        stats.action_taken("Forest");

        stats.reincarnated();

        assert_eq!(stats.current(Stat::CriticalActions), 0);
        assert_eq!(stats.lifetime_sum(Stat::CriticalActions), 1);
        assert_eq!(stats.current(Stat::Reincarnations), 0);
        assert_eq!(stats.lifetime_sum(Stat::Reincarnations), 1);
        assert!(!stats.performed_one_shot(&OneShotId::new("free-woodsman")));
        assert_eq!(stats.lifetime_actions_taken("Forest"), 1);
        assert_eq!(stats.actions_taken("Forest"), 0);
    }

    #[test]
    fn test_unlocks_are_sticky() {
        let mut stats = ProgressStats::new();
        stats.unlock(NamedUnlock::ThreeEggs);
        stats.unlock(NamedUnlock::ThreeEggs);
        stats.reincarnated();
        assert!(stats.unlocked(NamedUnlock::ThreeEggs));
        assert!(!stats.unlocked(NamedUnlock::SuperSlowAction));
    }

    #[test]
    fn test_old_snapshot_missing_cells_is_healed() {
        // Saved before spell tracking existed
        let json = r#"{"simple_stats": {"Clicks": {"current": 4, "sum": 9}}}"#;
        let mut stats = ProgressStats::from_json(json).unwrap();

        assert_eq!(stats.current(Stat::Clicks), 4);
        assert_eq!(stats.current(Stat::SpellsCast), 0);
        stats.spell_cast();
        assert_eq!(stats.lifetime_sum(Stat::SpellsCast), 1);
        assert!(stats.data().simple_stats.contains_key(&Stat::SpellsCast));
    }

    #[test]
    fn test_set_level_tracks_class_best() {
        let mut stats = ProgressStats::new();
        stats.set_level(5, "Farmer");
        stats.set_level(3, "Farmer");
        assert_eq!(stats.best_level("Farmer"), 5);
        assert_eq!(stats.current(Stat::PlayerLevel), 3);
        assert_eq!(stats.lifetime_sum(Stat::PlayerLevel), 3);
    }

    #[test]
    fn test_check_skill_unlock_progress() {
        let mut stats = ProgressStats::new();
        stats.set_skills(&SkillMap::from_pairs(&[(SkillType::Farming, 6.0)]));
        assert_eq!(stats.check_skill_unlock(SkillType::Farming, 15.0), SkillUnlock::Progress(0.4));

        stats.set_skills(&SkillMap::from_pairs(&[(SkillType::Farming, 15.0)]));
        stats.reincarnated();
        assert_eq!(stats.check_skill_unlock(SkillType::Farming, 15.0), SkillUnlock::Reached);
    }
}
