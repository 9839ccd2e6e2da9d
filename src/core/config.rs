//! Engine configuration with documented constants
//!
//! All tuning numbers for the action loop and effect timers live here.
//! Every engine owns its own copy, so two engines in one process can run
//! with different pacing.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{NamedUnlock, SkillType};

/// Configuration for the action loop and timed effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === ACTION LOOP ===
    /// Delay of an action with zero slowdown at speed multiplier 1.0 (ms)
    ///
    /// The full formula is `(slowdown + 1) * base_zone_delay / speed`, so an
    /// unskilled player with slowdown 2.0 waits three times this long.
    pub base_zone_delay_ms: u64,

    /// How many draws the selector makes before giving up on finding an
    /// action that isn't an already-performed one-shot
    ///
    /// One-shot actions should carry low weights. Hitting this cap means
    /// either the zone data is wrong or the player got very unlucky.
    pub selector_max_tries: u32,

    /// Slowdown above which completing an action grants
    /// `NamedUnlock::SuperSlowAction`
    pub super_slow_threshold: f64,

    /// Consecutive-action achievement rule
    pub streak: StreakRule,

    // === EFFECT TIMERS ===
    /// How often running cooldowns and buff durations re-check the clock (ms)
    ///
    /// Elapsed time is measured from the wall clock on each check, so this
    /// only controls how promptly expiry is noticed, not how long effects last.
    pub effect_tick_interval_ms: u64,

    // === RANDOMNESS ===
    /// Seed for the engine's random source; entropy-seeded when absent
    pub rng_seed: Option<u64>,
}

/// Achievement for performing the same kind of action several times in a row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakRule {
    /// Zone (by display name) in which the streak is counted
    pub zone: String,
    /// The action must award a positive delta in this skill
    pub skill: SkillType,
    /// Streak length that grants the unlock
    pub length: u32,
    pub unlock: NamedUnlock,
}

impl Default for StreakRule {
    fn default() -> Self {
        Self {
            zone: "Gryphon Nest".to_string(),
            skill: SkillType::Stealth,
            length: 3,
            unlock: NamedUnlock::ThreeEggs,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base_zone_delay_ms: 3000,
            selector_max_tries: 20,
            super_slow_threshold: 20.0,
            streak: StreakRule::default(),
            effect_tick_interval_ms: 1000,
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_zone_delay(&self) -> Duration {
        Duration::from_millis(self.base_zone_delay_ms)
    }

    pub fn effect_tick_interval(&self) -> Duration {
        Duration::from_millis(self.effect_tick_interval_ms)
    }

    /// Parse a config from TOML; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.base_zone_delay_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "base_zone_delay_ms must be positive".into(),
            ));
        }

        // A zero interval would re-arm effect ticks forever without time passing
        if self.effect_tick_interval_ms == 0 {
            return Err(EngineError::InvalidConfig(
                "effect_tick_interval_ms must be positive".into(),
            ));
        }

        if self.selector_max_tries == 0 {
            return Err(EngineError::InvalidConfig(
                "selector_max_tries must be at least 1".into(),
            ));
        }

        if self.streak.length == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "streak length for {} must be at least 1",
                self.streak.zone
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.selector_max_tries, 20);
        assert_eq!(config.effect_tick_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            base_zone_delay_ms = 500
            rng_seed = 7

            [streak]
            zone = "Haunted Mill"
            skill = "Piety"
            length = 4
            unlock = "ThreeEggs"
            "#,
        )
        .unwrap();

        assert_eq!(config.base_zone_delay_ms, 500);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.streak.zone, "Haunted Mill");
        assert_eq!(config.streak.skill, SkillType::Piety);
        assert_eq!(config.effect_tick_interval_ms, 1000);
    }

    #[test]
    fn test_zero_tick_interval_rejected() {
        let result = EngineConfig::from_toml_str("effect_tick_interval_ms = 0");
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let result = EngineConfig::from_toml_str("base_zone_delay_ms = \"soon\"");
        assert!(matches!(result, Err(EngineError::ConfigParse(_))));
    }
}
