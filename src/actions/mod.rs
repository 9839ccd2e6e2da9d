//! The action loop: selection, scheduling and outcome resolution

pub mod outcome;
pub mod resolver;
pub mod scheduler;
pub mod selector;

pub use outcome::{ActionEvent, ActionOutcome, PostActionInfo, ProtoActionOutcome, SecondaryAction};
pub use resolver::{OutcomeResolver, CRIT_SUFFIX};
pub use scheduler::{ActionScheduler, DelayCalc, LoopEnv};
pub use selector::{ActionSelector, Selection};
