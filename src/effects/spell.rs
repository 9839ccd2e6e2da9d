//! Player-triggered effects gated by a cooldown

use std::time::Duration;

use crate::effects::context::EffectContext;
use crate::effects::timer::EffectTimer;
use crate::timing::CountdownTick;

pub trait SpellEffect {
    /// Returns whether the cast succeeded. Only a successful cast starts the
    /// cooldown.
    fn on_cast(&mut self, ctx: &mut EffectContext<'_>) -> bool;

    fn on_cooldown_cleared(&mut self, _ctx: &mut EffectContext<'_>) {}
}

pub struct Spell {
    name: String,
    description: String,
    cooldown: EffectTimer,
    effect: Box<dyn SpellEffect>,
}

impl Spell {
    pub fn new(
        name: impl Into<String>,
        cooldown: Duration,
        effect: impl SpellEffect + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            cooldown: EffectTimer::new(cooldown),
            effect: Box::new(effect),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown.duration()
    }

    pub fn remaining_cooldown(&self) -> Duration {
        self.cooldown.remaining()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooldown.is_running()
    }

    pub fn cast(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        if self.cooldown.is_running() {
            tracing::debug!("Can't cast {}. Still on cooldown", self.name);
            return false;
        }
        let success = self.effect.on_cast(ctx);
        if success {
            self.cooldown.start(&self.name, ctx);
        }
        success
    }

    pub(crate) fn on_tick(&mut self, generation: u64, ctx: &mut EffectContext<'_>) {
        if self.cooldown.on_tick(&self.name, generation, ctx) == CountdownTick::Expired {
            tracing::debug!("{} is off cooldown", self.name);
            self.effect.on_cooldown_cleared(ctx);
        }
    }

    pub(crate) fn teardown(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        if !self.cooldown.cancel(ctx) {
            return false;
        }
        self.effect.on_cooldown_cleared(ctx);
        true
    }
}

impl std::fmt::Debug for Spell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spell")
            .field("name", &self.name)
            .field("cooldown", &self.cooldown)
            .finish_non_exhaustive()
    }
}
