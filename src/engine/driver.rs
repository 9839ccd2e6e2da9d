//! Tokio driver for an engine
//!
//! Sleeps until the next timer deadline or the next command, whichever comes
//! first. The engine itself stays on the driving task; other tasks talk to it
//! through an `EngineHandle`.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

use crate::core::clock::TokioClock;
use crate::core::types::ZoneId;
use crate::engine::Engine;
use crate::player::PlayerProvider;
use crate::stats::StatsTracker;
use crate::zones::Zone;

#[derive(Debug)]
pub enum EngineCommand {
    StartZone(Arc<dyn Zone>),
    StopZone(ZoneId),
    StopAll,
    SetSpeed(f64),
    SetInexperience(f64),
    AddBuff(String),
    Cast(String),
    DeactivateAll,
    Reincarnate,
    Shutdown,
}

/// Cloneable sender side of a driver. Every method returns false once the
/// driver has stopped.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineCommand>,
}

impl EngineHandle {
    pub fn send(&self, command: EngineCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn start_zone(&self, zone: Arc<dyn Zone>) -> bool {
        self.send(EngineCommand::StartZone(zone))
    }

    pub fn stop_zone(&self, zone: ZoneId) -> bool {
        self.send(EngineCommand::StopZone(zone))
    }

    pub fn set_speed(&self, value: f64) -> bool {
        self.send(EngineCommand::SetSpeed(value))
    }

    pub fn add_buff(&self, name: impl Into<String>) -> bool {
        self.send(EngineCommand::AddBuff(name.into()))
    }

    pub fn cast(&self, name: impl Into<String>) -> bool {
        self.send(EngineCommand::Cast(name.into()))
    }

    pub fn reincarnate(&self) -> bool {
        self.send(EngineCommand::Reincarnate)
    }

    pub fn shutdown(&self) -> bool {
        self.send(EngineCommand::Shutdown)
    }
}

pub fn channel() -> (EngineHandle, mpsc::UnboundedReceiver<EngineCommand>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EngineHandle { tx }, rx)
}

/// Drive `engine` until `Shutdown` arrives or every handle is dropped
pub async fn run<P, S>(
    engine: &mut Engine<P, S, TokioClock>,
    mut commands: mpsc::UnboundedReceiver<EngineCommand>,
) where
    P: PlayerProvider,
    S: StatsTracker,
{
    tracing::info!("Engine driver started");

    loop {
        engine.advance();
        let deadline = engine.next_deadline();

        tokio::select! {
            command = commands.recv() => match command {
                Some(EngineCommand::Shutdown) | None => break,
                Some(command) => apply(engine, command),
            },
            _ = sleep_until(deadline) => {}
        }
    }

    tracing::info!("Engine driver stopped");
}

fn apply<P, S>(engine: &mut Engine<P, S, TokioClock>, command: EngineCommand)
where
    P: PlayerProvider,
    S: StatsTracker,
{
    tracing::debug!("Engine command: {:?}", command);

    match command {
        EngineCommand::StartZone(zone) => {
            engine.start_zone(zone);
        }
        EngineCommand::StopZone(zone) => {
            engine.stop_zone(zone);
        }
        EngineCommand::StopAll => {
            engine.stop_all();
        }
        EngineCommand::SetSpeed(value) => {
            if value > 0.0 {
                engine.set_speed_multiplier(value);
            } else {
                tracing::warn!("Ignoring non-positive speed multiplier {}", value);
            }
        }
        EngineCommand::SetInexperience(value) => engine.set_inexperience_multiplier(value),
        EngineCommand::AddBuff(name) => {
            if let Err(err) = engine.add_buff(&name) {
                tracing::warn!("add_buff({}) failed: {}", name, err);
            }
        }
        EngineCommand::Cast(name) => match engine.cast(&name) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("{} was not cast", name),
            Err(err) => tracing::warn!("cast({}) failed: {}", name, err),
        },
        EngineCommand::DeactivateAll => {
            engine.deactivate_all();
        }
        EngineCommand::Reincarnate => engine.reincarnate(),
        EngineCommand::Shutdown => {}
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}
