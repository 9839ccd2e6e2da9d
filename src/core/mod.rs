pub mod clock;
pub mod config;
pub mod error;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use config::{EngineConfig, StreakRule};
pub use error::{EngineError, Result};
pub use types::{NamedUnlock, OneShotId, SkillMap, SkillType, ZoneId};
