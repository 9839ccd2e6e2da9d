use crate::zones::LiveActionId;

/// What a pending timer does when it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// The live action with this id has finished waiting
    ActionDue(LiveActionId),
    /// Periodic check of a named effect's cooldown or duration
    EffectTick { name: String, generation: u64 },
}
