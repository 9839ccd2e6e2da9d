pub mod channel;

pub use channel::{Broadcast, ReplayChannel, SubscriptionId};
