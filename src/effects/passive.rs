//! Permanent effects

use crate::effects::context::EffectContext;

pub trait PassiveEffect {
    /// Returns whether the passive took hold
    fn apply(&mut self, ctx: &mut EffectContext<'_>) -> bool;
}

pub struct Passive {
    name: String,
    description: String,
    effect: Box<dyn PassiveEffect>,
}

impl Passive {
    pub fn new(name: impl Into<String>, effect: impl PassiveEffect + 'static) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
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

    pub fn apply(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        self.effect.apply(ctx)
    }
}

impl std::fmt::Debug for Passive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Passive")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
