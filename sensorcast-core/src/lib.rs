// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Core model of the sensorcast telemetry engine.
//!
//! - [`ChannelSpec`] / [`Channel`]: one bounded sensor stream
//! - [`RandomWalkGenerator`]: next value from the current one, clamped and rounded
//! - [`SensorRegistry`]: the single writer of channel values
//! - [`SnapshotService`]: read-side queries used by pull endpoints and joins
pub mod channel;
pub mod clock;
pub mod random_walk;
pub mod reading;
pub mod registry;
pub mod snapshot;
pub mod snapshot_service;

pub use self::channel::{default_channels, Channel, ChannelSpec};
pub use self::clock::{Clock, SystemClock};
pub use self::random_walk::{apply_step, round_to_tenth, RandomWalkGenerator};
pub use self::reading::Reading;
pub use self::registry::SensorRegistry;
pub use self::snapshot::SensorSnapshot;
pub use self::snapshot_service::SnapshotService;
pub use sensorcast_error::{Result, SensorcastError};
