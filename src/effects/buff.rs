//! Temporary effects with a duration

use std::time::Duration;

use tokio::sync::oneshot;

use crate::effects::context::EffectContext;
use crate::effects::timer::EffectTimer;
use crate::timing::CountdownTick;

pub trait BuffEffect {
    fn on_apply(&mut self, ctx: &mut EffectContext<'_>);

    /// Runs once when the buff wears off or is torn down
    fn clean_up(&mut self, ctx: &mut EffectContext<'_>);
}

/// What re-activating a running buff does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshPolicy {
    #[default]
    ResetDuration,
    /// Re-activation is absorbed without extending anything
    KeepRemaining,
}

pub struct Buff {
    name: String,
    description: String,
    timer: EffectTimer,
    refresh_policy: RefreshPolicy,
    effect: Box<dyn BuffEffect>,
    /// Fired exactly once, on natural expiry
    completion: Option<oneshot::Sender<()>>,
}

impl Buff {
    pub fn new(name: impl Into<String>, duration: Duration, effect: impl BuffEffect + 'static) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            timer: EffectTimer::new(duration),
            refresh_policy: RefreshPolicy::default(),
            effect: Box::new(effect),
            completion: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_refresh_policy(mut self, policy: RefreshPolicy) -> Self {
        self.refresh_policy = policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn duration(&self) -> Duration {
        self.timer.duration()
    }

    pub fn remaining(&self) -> Duration {
        self.timer.remaining()
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Run the activation effect and start the duration. The receiver
    /// resolves when the buff wears off; it is closed without a value if the
    /// buff is torn down first.
    pub fn apply(&mut self, ctx: &mut EffectContext<'_>) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        self.completion = Some(tx);
        self.timer.start(&self.name, ctx);
        self.effect.on_apply(ctx);
        rx
    }

    /// Extend a running buff. Never re-runs activation.
    pub fn refresh(&mut self, ctx: &EffectContext<'_>) -> bool {
        match self.refresh_policy {
            RefreshPolicy::ResetDuration => {
                tracing::debug!("Refreshing duration of {}", self.name);
                self.timer.refresh(ctx)
            }
            RefreshPolicy::KeepRemaining => self.timer.is_running(),
        }
    }

    /// Returns true when this tick made the buff wear off
    pub(crate) fn on_tick(&mut self, generation: u64, ctx: &mut EffectContext<'_>) -> bool {
        if self.timer.on_tick(&self.name, generation, ctx) != CountdownTick::Expired {
            return false;
        }
        tracing::info!("{} wore off", self.name);
        self.effect.clean_up(ctx);
        if let Some(tx) = self.completion.take() {
            let _ = tx.send(());
        }
        true
    }

    pub(crate) fn teardown(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        if !self.timer.cancel(ctx) {
            return false;
        }
        self.effect.clean_up(ctx);
        self.completion = None;
        true
    }
}

impl std::fmt::Debug for Buff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buff")
            .field("name", &self.name)
            .field("timer", &self.timer)
            .field("refresh_policy", &self.refresh_policy)
            .finish_non_exhaustive()
    }
}
