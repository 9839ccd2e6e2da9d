//! Periodic countdown driver shared by spell cooldowns and buff durations

use std::time::Duration;

use crate::effects::context::EffectContext;
use crate::timing::{Countdown, CountdownTick, TimerEvent, TimerId};

#[derive(Debug, Clone)]
pub struct EffectTimer {
    countdown: Countdown,
    /// The armed periodic check, while running
    pending: Option<TimerId>,
}

impl EffectTimer {
    pub fn new(duration: Duration) -> Self {
        Self {
            countdown: Countdown::new(duration),
            pending: None,
        }
    }

    pub fn duration(&self) -> Duration {
        self.countdown.duration()
    }

    pub fn remaining(&self) -> Duration {
        self.countdown.remaining()
    }

    pub fn is_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// Start from the full duration and arm the first check
    pub fn start(&mut self, name: &str, ctx: &mut EffectContext<'_>) {
        if let Some(id) = self.pending.take() {
            ctx.timers.cancel(id);
        }
        let generation = self.countdown.start(ctx.now);
        self.arm(name, generation, ctx);
    }

    /// Handle a fired check. Checks from an earlier run are ignored.
    pub fn on_tick(
        &mut self,
        name: &str,
        generation: u64,
        ctx: &mut EffectContext<'_>,
    ) -> CountdownTick {
        if generation != self.countdown.generation() {
            return CountdownTick::Idle;
        }
        self.pending = None;

        let tick = self.countdown.tick(ctx.now);
        if let CountdownTick::Running(_) = tick {
            self.arm(name, generation, ctx);
        }
        tick
    }

    /// Back to the full duration without touching the armed check
    pub fn refresh(&mut self, ctx: &EffectContext<'_>) -> bool {
        self.countdown.refresh(ctx.now)
    }

    /// Stop immediately. Returns whether it was running.
    pub fn cancel(&mut self, ctx: &mut EffectContext<'_>) -> bool {
        if let Some(id) = self.pending.take() {
            ctx.timers.cancel(id);
        }
        self.countdown.stop()
    }

    fn arm(&mut self, name: &str, generation: u64, ctx: &mut EffectContext<'_>) {
        let at = ctx.next_check();
        self.pending = Some(ctx.timers.schedule(
            at,
            TimerEvent::EffectTick {
                name: name.to_string(),
                generation,
            },
        ));
    }
}
