//! Timer primitives for the cooperative event loop
//!
//! - `TimerQueue`: one-shot deadlines, cancellable, popped in order
//! - `Countdown`: wall-clock countdown shared by cooldowns and buff durations
//! - `TimerEvent`: what the engine does when a timer fires
//! - `clamp_delay`: keeps action waits between 1ms and 7 days

pub mod countdown;
pub mod delay;
pub mod event;
pub mod queue;

pub use countdown::{Countdown, CountdownTick};
pub use delay::{clamp_delay, MAX_ACTION_DELAY, MIN_ACTION_DELAY};
pub use event::TimerEvent;
pub use queue::{TimerId, TimerQueue};
