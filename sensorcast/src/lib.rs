// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! # Sensorcast
//!
//! Simulated environmental telemetry, generated on a fixed period and fanned
//! out to every connected subscriber.
//!
//! ## Overview
//!
//! A set of named channels (temperature, humidity, pressure, carbon monoxide,
//! nitrogen dioxide by default) each follows a bounded random walk. On every
//! tick all channels advance together and the resulting snapshot is pushed to
//! all subscribers. The same state can be queried on demand.
//!
//! - **Push**: [`TelemetryEngine::join`] yields a stream whose first item is the
//!   current snapshot, followed by one snapshot per tick
//! - **Pull**: [`TelemetryEngine::snapshots`] answers "all channels" without
//!   advancing anything, and "one channel by name" by advancing that channel
//!   one step and returning its fresh reading
//!
//! Slow subscribers never hold up a tick. When a subscriber's queue is full it
//! is disconnected and the broadcast carries on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use sensorcast::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> sensorcast::Result<()> {
//!     let mut engine = TelemetryEngine::new(EngineConfig::default())?;
//!     let mut updates = engine.join()?;
//!     engine.start()?;
//!
//!     while let Some(snapshot) = updates.next().await {
//!         for reading in snapshot.iter() {
//!             println!("{} = {} {}", reading.name(), reading.value(), reading.unit());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

// Re-export core types
pub use sensorcast_core::{
    default_channels, Channel, ChannelSpec, Clock, RandomWalkGenerator, Reading, SensorRegistry,
    SensorSnapshot, SnapshotService, SystemClock,
};

// Re-export the engine
pub use sensorcast_engine::{
    BroadcastReport, EngineConfig, EngineHandle, EngineState, SharedSnapshot, SubscriberHub,
    SubscriberId, SubscriberInfo, Subscription, TelemetryEngine, TickScheduler,
};

pub use sensorcast_engine::engine::DEFAULT_SUBSCRIBER_BUFFER;
pub use sensorcast_engine::scheduler::DEFAULT_TICK_INTERVAL;
pub use sensorcast_error::{Result, SensorcastError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ChannelSpec, EngineConfig, Reading, SensorSnapshot, SensorcastError, SnapshotService,
        Subscription, TelemetryEngine,
    };
}
