//! Zones, their actions, and the live instance of whichever action is running

pub mod live;
pub mod zone;

pub use live::{LiveAction, LiveActionId, LiveStatus};
pub use zone::{WeightedZone, Zone, ZoneAction, ZoneActionDescription};
