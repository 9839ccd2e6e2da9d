//! Timed effects: spells with cooldowns, buffs with durations, passives
//!
//! Effects never own timers. Cooldowns and durations arm periodic checks in
//! the engine's timer queue; the engine routes fired checks back through
//! `EffectRegistry::on_tick`.

pub mod buff;
pub mod builtin;
pub mod context;
pub mod passive;
pub mod registry;
pub mod spell;
pub mod timer;

pub use buff::{Buff, BuffEffect, RefreshPolicy};
pub use builtin::{BuffingSpell, CritPassive, HasteBuff};
pub use context::EffectContext;
pub use passive::{Passive, PassiveEffect};
pub use registry::{Activation, Effect, EffectFactory, EffectRegistry};
pub use spell::{Spell, SpellEffect};
pub use timer::EffectTimer;
