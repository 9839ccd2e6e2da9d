//! Name-keyed registry of active spells, buffs and passives
//!
//! At most one instance per name is ever registered. Activating a name that
//! is already present never creates a second instance: a running buff is
//! refreshed, a known spell or applied passive is left alone.

use ahash::AHashMap;
use tokio::sync::oneshot;

use crate::core::error::{EngineError, Result};
use crate::core::types::NamedUnlock;
use crate::effects::buff::Buff;
use crate::effects::context::EffectContext;
use crate::effects::passive::Passive;
use crate::effects::spell::Spell;

#[derive(Debug)]
pub enum Effect {
    Spell(Spell),
    Buff(Buff),
    Passive(Passive),
}

impl Effect {
    pub fn name(&self) -> &str {
        match self {
            Effect::Spell(spell) => spell.name(),
            Effect::Buff(buff) => buff.name(),
            Effect::Passive(passive) => passive.name(),
        }
    }

    /// Cooling down or still in effect
    pub fn is_running(&self) -> bool {
        match self {
            Effect::Spell(spell) => spell.is_cooling_down(),
            Effect::Buff(buff) => buff.is_running(),
            Effect::Passive(_) => false,
        }
    }
}

impl From<Spell> for Effect {
    fn from(spell: Spell) -> Self {
        Effect::Spell(spell)
    }
}

impl From<Buff> for Effect {
    fn from(buff: Buff) -> Self {
        Effect::Buff(buff)
    }
}

impl From<Passive> for Effect {
    fn from(passive: Passive) -> Self {
        Effect::Passive(passive)
    }
}

/// Result of an activation request
#[derive(Debug)]
pub enum Activation {
    /// Spell added to the known set
    Learned,
    AlreadyKnown,
    /// Resolves when the buff wears off
    BuffStarted(oneshot::Receiver<()>),
    /// Running buff extended instead of reapplied
    Refreshed,
    /// Passive applied; false when it did not take hold
    Applied(bool),
    AlreadyApplied,
}

pub type EffectFactory = Box<dyn Fn() -> Effect>;

#[derive(Default)]
pub struct EffectRegistry {
    entries: AHashMap<String, Effect>,
    catalog: AHashMap<String, EffectFactory>,
}

impl EffectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // === CATALOG ===

    /// Make `name` available to `add_buff` and to buff requests from effects
    pub fn register_template<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Effect + 'static,
    {
        self.catalog.insert(name.into(), Box::new(factory));
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.catalog.contains_key(name)
    }

    // === ACTIVATION ===

    pub fn activate(&mut self, effect: Effect, ctx: &mut EffectContext<'_>) -> Activation {
        let activation = self.activate_one(effect, ctx);
        self.process_requests(ctx);
        activation
    }

    /// Activate a fresh instance of the catalog entry `name`
    pub fn add_buff(&mut self, name: &str, ctx: &mut EffectContext<'_>) -> Result<Activation> {
        let activation = self.activate_named(name, ctx)?;
        self.process_requests(ctx);
        Ok(activation)
    }

    /// Cast a known spell. Ok(false) while it is cooling down or when its
    /// effect reports failure.
    pub fn cast(&mut self, name: &str, ctx: &mut EffectContext<'_>) -> Result<bool> {
        let Some(Effect::Spell(spell)) = self.entries.get_mut(name) else {
            return Err(EngineError::UnknownEffect(name.to_string()));
        };
        let success = spell.cast(ctx);
        if success {
            ctx.stats.spell_cast();
            ctx.stats.unlock(NamedUnlock::FirstSpell);
        }
        self.process_requests(ctx);
        Ok(success)
    }

    /// Route a fired periodic check. Returns false for checks whose effect is
    /// gone.
    pub fn on_tick(&mut self, name: &str, generation: u64, ctx: &mut EffectContext<'_>) -> bool {
        let expired = match self.entries.get_mut(name) {
            Some(Effect::Spell(spell)) => {
                spell.on_tick(generation, ctx);
                false
            }
            Some(Effect::Buff(buff)) => buff.on_tick(generation, ctx),
            _ => return false,
        };
        if expired {
            self.entries.remove(name);
        }
        self.process_requests(ctx);
        true
    }

    /// Forced teardown of every running buff and spell cooldown. Buffs are
    /// dropped; spells stay known and passives stay applied. Returns how many
    /// effects were torn down.
    pub fn deactivate_all(&mut self, ctx: &mut EffectContext<'_>) -> usize {
        let mut torn_down = 0;
        for effect in self.entries.values_mut() {
            let stopped = match effect {
                Effect::Spell(spell) => spell.teardown(ctx),
                Effect::Buff(buff) => buff.teardown(ctx),
                Effect::Passive(_) => false,
            };
            if stopped {
                torn_down += 1;
            }
        }
        self.entries.retain(|_, effect| !matches!(effect, Effect::Buff(_)));
        self.discard_requests(ctx);
        torn_down
    }

    /// Tear everything down and forget all effects, passives included.
    /// Catalog templates are kept.
    pub fn clear(&mut self, ctx: &mut EffectContext<'_>) {
        self.deactivate_all(ctx);
        self.entries.clear();
    }

    // === QUERIES ===

    pub fn get(&self, name: &str) -> Option<&Effect> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Known spells, by name
    pub fn spells(&self) -> Vec<&Spell> {
        let mut spells: Vec<&Spell> = self
            .entries
            .values()
            .filter_map(|effect| match effect {
                Effect::Spell(spell) => Some(spell),
                _ => None,
            })
            .collect();
        spells.sort_by(|a, b| a.name().cmp(b.name()));
        spells
    }

    /// Running buffs, by name
    pub fn buffs(&self) -> Vec<&Buff> {
        let mut buffs: Vec<&Buff> = self
            .entries
            .values()
            .filter_map(|effect| match effect {
                Effect::Buff(buff) => Some(buff),
                _ => None,
            })
            .collect();
        buffs.sort_by(|a, b| a.name().cmp(b.name()));
        buffs
    }

    /// Applied passives, by name
    pub fn passives(&self) -> Vec<&Passive> {
        let mut passives: Vec<&Passive> = self
            .entries
            .values()
            .filter_map(|effect| match effect {
                Effect::Passive(passive) => Some(passive),
                _ => None,
            })
            .collect();
        passives.sort_by(|a, b| a.name().cmp(b.name()));
        passives
    }

    // === INTERNALS ===

    fn activate_named(&mut self, name: &str, ctx: &mut EffectContext<'_>) -> Result<Activation> {
        let factory = self
            .catalog
            .get(name)
            .ok_or_else(|| EngineError::UnknownEffect(name.to_string()))?;
        let effect = factory();
        Ok(self.activate_one(effect, ctx))
    }

    fn activate_one(&mut self, effect: Effect, ctx: &mut EffectContext<'_>) -> Activation {
        let name = effect.name().to_string();

        if let Some(existing) = self.entries.get_mut(&name) {
            match existing {
                Effect::Buff(buff) if buff.is_running() => {
                    buff.refresh(ctx);
                    return Activation::Refreshed;
                }
                Effect::Spell(_) => return Activation::AlreadyKnown,
                Effect::Passive(_) => return Activation::AlreadyApplied,
                // Left over from a teardown; replaced below
                Effect::Buff(_) => {}
            }
        }

        match effect {
            Effect::Spell(spell) => {
                tracing::info!("Learned {}", name);
                self.entries.insert(name, Effect::Spell(spell));
                Activation::Learned
            }
            Effect::Buff(mut buff) => {
                let completion = buff.apply(ctx);
                self.entries.insert(name, Effect::Buff(buff));
                Activation::BuffStarted(completion)
            }
            Effect::Passive(mut passive) => {
                let applied = passive.apply(ctx);
                if applied {
                    self.entries.insert(name, Effect::Passive(passive));
                } else {
                    tracing::debug!("Passive {} did not take hold", name);
                }
                Activation::Applied(applied)
            }
        }
    }

    /// Follow-up buffs requested during a forced teardown are not started
    fn discard_requests(&mut self, ctx: &mut EffectContext<'_>) {
        while let Some(name) = ctx.next_buff_request() {
            tracing::debug!("Dropping request for {} made during teardown", name);
        }
    }

    /// Buffs asked for by effect callbacks, in request order
    fn process_requests(&mut self, ctx: &mut EffectContext<'_>) {
        while let Some(name) = ctx.next_buff_request() {
            if let Err(err) = self.activate_named(&name, ctx) {
                tracing::warn!("Requested buff {} could not be activated: {}", name, err);
            }
        }
    }
}
