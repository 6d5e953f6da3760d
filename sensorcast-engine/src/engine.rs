// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Generation-and-fan-out engine.
//!
//! [`TelemetryEngine`] wires the pieces together: every tick the
//! [`SensorRegistry`] advances all channels and the resulting snapshot is
//! handed to the [`SubscriberHub`]. Joins receive the current snapshot first.
//!
//! ```text
//!  TickScheduler ──tick──▶ SensorRegistry::advance_all ──snapshot──▶ SubscriberHub ──▶ subscribers
//!                                 ▲
//!  SnapshotService ───reads───────┘  (pull queries, join snapshots)
//! ```
//!
//! Lifecycle: `Initialized → Running → Stopped`. A stopped engine cannot be
//! restarted.

use crate::hub::{BroadcastReport, SubscriberHub, Subscription};
use crate::scheduler::{TickScheduler, DEFAULT_TICK_INTERVAL};
use sensorcast_core::{
    default_channels, ChannelSpec, Clock, RandomWalkGenerator, SensorRegistry, SensorSnapshot,
    SnapshotService, SystemClock,
};
use sensorcast_error::{Result, SensorcastError};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

/// Default per-subscriber outbound queue depth.
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 16;

/// Payload delivered to subscribers.
pub type SharedSnapshot = Arc<SensorSnapshot>;

/// Everything needed to build an engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub channels: Vec<ChannelSpec>,
    pub tick_interval: Duration,
    pub subscriber_buffer: usize,
    /// Fixed seed for a reproducible walk; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channels: default_channels(),
            tick_interval: DEFAULT_TICK_INTERVAL,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Initialized,
    Running,
    Stopped,
}

#[derive(Debug)]
pub struct TelemetryEngine {
    registry: Arc<SensorRegistry>,
    hub: SubscriberHub<SharedSnapshot>,
    scheduler: TickScheduler,
    state: EngineState,
}

impl TelemetryEngine {
    /// Validates the configuration and registers every channel.
    ///
    /// # Errors
    ///
    /// Any configuration error is fatal: invalid or duplicate channels, no
    /// channels at all, or a zero tick interval.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Like [`TelemetryEngine::new`] with an explicit timestamp source.
    ///
    /// # Errors
    ///
    /// See [`TelemetryEngine::new`].
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        let walk = config
            .seed
            .map_or_else(RandomWalkGenerator::from_entropy, RandomWalkGenerator::seeded);
        let registry = Arc::new(SensorRegistry::with_generator(
            config.channels,
            walk,
            clock,
        )?);
        let scheduler = TickScheduler::new(config.tick_interval)?;

        Ok(Self {
            registry,
            hub: SubscriberHub::new(config.subscriber_buffer),
            scheduler,
            state: EngineState::Initialized,
        })
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Starts ticking on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::InvalidState`] unless the engine is `Initialized`.
    pub fn start(&mut self) -> Result<()> {
        match self.state {
            EngineState::Initialized => {}
            EngineState::Running => {
                return Err(SensorcastError::invalid_state("engine is already running"))
            }
            EngineState::Stopped => {
                return Err(SensorcastError::invalid_state(
                    "a stopped engine cannot be restarted",
                ))
            }
        }

        let registry = Arc::clone(&self.registry);
        let hub = self.hub.clone();
        self.scheduler.start(move || {
            broadcast_tick(&registry, &hub);
            async { Ok::<(), Infallible>(()) }
        })?;

        self.state = EngineState::Running;
        info!(
            "telemetry engine running: {} channels every {:?}",
            self.registry.len(),
            self.scheduler.period()
        );
        Ok(())
    }

    /// Stops ticking and disconnects every subscriber.
    ///
    /// No tick fires and no delivery is attempted after this returns.
    /// Idempotent.
    pub async fn stop(&mut self) {
        if self.state == EngineState::Stopped {
            return;
        }
        self.scheduler.stop().await;
        self.hub.close();
        self.state = EngineState::Stopped;
        info!("telemetry engine stopped");
    }

    /// Runs one generation-and-broadcast cycle immediately.
    pub fn tick(&self) -> BroadcastReport {
        broadcast_tick(&self.registry, &self.hub)
    }

    /// Connects a new subscriber; its first payload is the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::HubClosed`] once the engine has stopped.
    pub fn join(&self) -> Result<Subscription<SharedSnapshot>> {
        join_current(&self.registry, &self.hub)
    }

    #[must_use]
    pub fn snapshots(&self) -> SnapshotService {
        SnapshotService::new(Arc::clone(&self.registry))
    }

    /// A cloneable handle for request handlers: joins and pull queries only.
    #[must_use]
    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            registry: Arc::clone(&self.registry),
            hub: self.hub.clone(),
        }
    }

    #[must_use]
    pub fn hub(&self) -> &SubscriberHub<SharedSnapshot> {
        &self.hub
    }

    #[must_use]
    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }
}

/// Shared, read-and-join side of a [`TelemetryEngine`].
///
/// Lifecycle stays with the engine; once it stops, [`EngineHandle::join`]
/// fails with [`SensorcastError::HubClosed`].
#[derive(Debug, Clone)]
pub struct EngineHandle {
    registry: Arc<SensorRegistry>,
    hub: SubscriberHub<SharedSnapshot>,
}

impl EngineHandle {
    /// See [`TelemetryEngine::join`].
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::HubClosed`] once the engine has stopped.
    pub fn join(&self) -> Result<Subscription<SharedSnapshot>> {
        join_current(&self.registry, &self.hub)
    }

    #[must_use]
    pub fn snapshots(&self) -> SnapshotService {
        SnapshotService::new(Arc::clone(&self.registry))
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }
}

fn join_current(
    registry: &SensorRegistry,
    hub: &SubscriberHub<SharedSnapshot>,
) -> Result<Subscription<SharedSnapshot>> {
    hub.join_with(|| Arc::new(registry.current_snapshot()))
}

fn broadcast_tick(
    registry: &SensorRegistry,
    hub: &SubscriberHub<SharedSnapshot>,
) -> BroadcastReport {
    let snapshot = Arc::new(registry.advance_all());
    hub.broadcast(&snapshot)
}
