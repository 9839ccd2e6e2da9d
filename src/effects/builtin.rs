//! Stock effects

use crate::effects::buff::BuffEffect;
use crate::effects::context::EffectContext;
use crate::effects::passive::PassiveEffect;
use crate::effects::spell::SpellEffect;

/// Spell whose cast activates a catalog buff
#[derive(Debug, Clone)]
pub struct BuffingSpell {
    buff_name: String,
}

impl BuffingSpell {
    pub fn new(buff_name: impl Into<String>) -> Self {
        Self {
            buff_name: buff_name.into(),
        }
    }
}

impl SpellEffect for BuffingSpell {
    fn on_cast(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        ctx.request_buff(self.buff_name.clone());
        true
    }
}

/// Multiplies action speed while active
#[derive(Debug, Clone, Copy)]
pub struct HasteBuff {
    factor: f64,
}

impl HasteBuff {
    /// Panics if `factor` is not positive.
    pub fn new(factor: f64) -> Self {
        assert!(factor > 0.0, "haste factor must be positive, got {}", factor);
        Self { factor }
    }
}

impl BuffEffect for HasteBuff {
    fn on_apply(&mut self, ctx: &mut EffectContext<'_>) {
        let speed = ctx.action_speed() * self.factor;
        ctx.set_action_speed(speed);
    }

    fn clean_up(&mut self, ctx: &mut EffectContext<'_>) {
        let speed = ctx.action_speed() / self.factor;
        ctx.set_action_speed(speed);
    }
}

/// Permanently raises crit chance, capped at 1
#[derive(Debug, Clone, Copy)]
pub struct CritPassive {
    bonus: f64,
}

impl CritPassive {
    pub fn new(bonus: f64) -> Self {
        Self { bonus }
    }
}

impl PassiveEffect for CritPassive {
    fn apply(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        match ctx.player.meta_mut() {
            Some(meta) => {
                meta.crit_chance = (meta.crit_chance + self.bonus).clamp(0.0, 1.0);
                true
            }
            None => false,
        }
    }
}
