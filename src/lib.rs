//! Idle Engine - action loop and timed effects for an idle game

pub mod actions;
pub mod core;
pub mod effects;
pub mod engine;
pub mod events;
pub mod player;
pub mod stats;
pub mod timing;
pub mod zones;

pub use crate::core::error::{EngineError, Result};
pub use crate::engine::Engine;
