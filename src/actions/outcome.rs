//! Outcome types produced when an action completes

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::types::{SkillMap, ZoneId};
use crate::zones::{LiveAction, Zone, ZoneAction};

/// Extra effect a listener attaches to an outcome ("kicker")
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryAction {
    pub description: String,
    pub skill_points: Option<SkillMap>,
}

impl SecondaryAction {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            skill_points: None,
        }
    }

    pub fn with_skill_points(mut self, points: SkillMap) -> Self {
        self.skill_points = Some(points);
        self
    }
}

/// Outcome still being assembled; listeners may add kickers or boost the
/// multiplier before it is finalized
#[derive(Debug, Clone)]
pub struct ProtoActionOutcome {
    pub action: Arc<ZoneAction>,
    pub zone: ZoneId,
    pub zone_name: String,
    pub kickers: Vec<SecondaryAction>,
    pub sp_multiplier: f64,
}

impl ProtoActionOutcome {
    pub fn new(action: Arc<ZoneAction>, zone: &dyn Zone) -> Self {
        Self {
            action,
            zone: zone.zid(),
            zone_name: zone.name().to_string(),
            kickers: Vec::new(),
            sp_multiplier: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionEvent {
    pub description: String,
    /// Points actually gained; None for kickers that grant no skill points
    pub points_gained: Option<SkillMap>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub main: ActionEvent,
    pub secondary: Vec<ActionEvent>,
    pub crit: bool,
}

/// Published once per completed action
#[derive(Debug, Clone)]
pub struct PostActionInfo {
    pub outcome: ActionOutcome,
    /// Already running when this is published
    pub next_action: LiveAction,
}
