// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::clock::ManualClock;
use sensorcast_core::{default_channels, ChannelSpec, RandomWalkGenerator, SensorRegistry};
use std::sync::Arc;

/// Registry over the five default channels with a deterministic walk.
///
/// # Panics
///
/// Never for the built-in defaults.
#[must_use]
pub fn seeded_registry(seed: u64, clock: ManualClock) -> SensorRegistry {
    SensorRegistry::with_generator(
        default_channels(),
        RandomWalkGenerator::seeded(seed),
        Arc::new(clock),
    )
    .expect("default channels are valid")
}

/// Just the temperature channel: initial 25, bounds [15, 35].
#[must_use]
pub fn temperature_only() -> Vec<ChannelSpec> {
    vec![ChannelSpec::new("temperature", 25.0, "°C", 15.0, 35.0)]
}

/// A channel whose bounds are two steps apart, so the walk keeps hitting them.
#[must_use]
pub fn narrow_channel() -> ChannelSpec {
    ChannelSpec::new("narrow", 0.5, "u", 0.0, 1.0)
}
