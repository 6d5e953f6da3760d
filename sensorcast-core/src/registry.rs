// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Authoritative store of channel state.
//!
//! The registry is the only writer of channel values. All mutation and all
//! snapshot reads go through one lock, so [`SensorRegistry::advance_all`] is
//! atomic with respect to [`SensorRegistry::current_snapshot`]: a reader sees
//! either every channel before a tick or every channel after it.
//!
//! ## Example
//!
//! ```
//! use sensorcast_core::{default_channels, RandomWalkGenerator, SensorRegistry, SystemClock};
//! use std::sync::Arc;
//!
//! let registry = SensorRegistry::with_generator(
//!     default_channels(),
//!     RandomWalkGenerator::seeded(7),
//!     Arc::new(SystemClock),
//! )
//! .unwrap();
//!
//! let snapshot = registry.advance_all();
//! assert_eq!(snapshot.len(), 5);
//!
//! let reading = registry.advance_one("temperature").unwrap();
//! assert!((15.0..=35.0).contains(&reading.value()));
//! ```

use crate::channel::{Channel, ChannelSpec};
use crate::clock::{Clock, SystemClock};
use crate::random_walk::RandomWalkGenerator;
use crate::reading::Reading;
use crate::snapshot::SensorSnapshot;
use parking_lot::Mutex;
use sensorcast_error::{Result, SensorcastError};
use std::collections::HashMap;
use std::sync::Arc;

struct RegistryState {
    channels: Vec<Channel>,
    walk: RandomWalkGenerator,
}

/// Thread-safe registry of sensor channels.
pub struct SensorRegistry {
    // Built once at construction; channels are never added or removed afterwards.
    index: HashMap<String, usize>,
    state: Mutex<RegistryState>,
    clock: Arc<dyn Clock>,
}

impl SensorRegistry {
    /// Registers the given channels with an OS-seeded generator and the system clock.
    ///
    /// # Errors
    ///
    /// See [`SensorRegistry::with_generator`].
    pub fn new(specs: impl IntoIterator<Item = ChannelSpec>) -> Result<Self> {
        Self::with_generator(specs, RandomWalkGenerator::from_entropy(), Arc::new(SystemClock))
    }

    /// Registers the given channels in iteration order.
    ///
    /// # Errors
    ///
    /// - [`SensorcastError::GenerationFault`] if any definition is invalid
    /// - [`SensorcastError::DuplicateChannel`] if two definitions share a name
    /// - [`SensorcastError::InvalidState`] if no channel is given
    pub fn with_generator(
        specs: impl IntoIterator<Item = ChannelSpec>,
        walk: RandomWalkGenerator,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let mut index = HashMap::new();
        let mut channels = Vec::new();

        for spec in specs {
            if index.contains_key(&spec.name) {
                return Err(SensorcastError::duplicate_channel(spec.name));
            }
            let channel = Channel::from_spec(spec)?;
            index.insert(channel.name().to_string(), channels.len());
            channels.push(channel);
        }

        if channels.is_empty() {
            return Err(SensorcastError::invalid_state(
                "at least one channel must be registered",
            ));
        }

        Ok(Self {
            index,
            state: Mutex::new(RegistryState { channels, walk }),
            clock,
        })
    }

    /// Advances one channel by a random step and returns its fresh reading.
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::UnknownChannel`] if `name` is not registered.
    pub fn advance_one(&self, name: &str) -> Result<Reading> {
        let position = self.position(name)?;
        let mut state = self.state.lock();
        let now = self.clock.now();

        let RegistryState { channels, walk } = &mut *state;
        let channel = &mut channels[position];
        advance(channel, walk);
        Ok(channel.reading_at(now))
    }

    /// Advances every channel in registration order.
    ///
    /// All readings of the returned snapshot share one generation timestamp.
    pub fn advance_all(&self) -> SensorSnapshot {
        let mut state = self.state.lock();
        let now = self.clock.now();

        let RegistryState { channels, walk } = &mut *state;
        let readings = channels
            .iter_mut()
            .map(|channel| {
                advance(channel, walk);
                channel.reading_at(now)
            })
            .collect();

        SensorSnapshot::new(now, readings)
    }

    /// Reads every channel without advancing it, stamped with the query time.
    pub fn current_snapshot(&self) -> SensorSnapshot {
        let state = self.state.lock();
        let now = self.clock.now();

        let readings = state
            .channels
            .iter()
            .map(|channel| channel.reading_at(now))
            .collect();

        SensorSnapshot::new(now, readings)
    }

    /// Returns a copy of one channel's current state.
    #[must_use]
    pub fn channel(&self, name: &str) -> Option<Channel> {
        let position = *self.index.get(name)?;
        Some(self.state.lock().channels[position].clone())
    }

    /// Channel names in registration order.
    #[must_use]
    pub fn channel_names(&self) -> Vec<String> {
        self.state
            .lock()
            .channels
            .iter()
            .map(|channel| channel.name().to_string())
            .collect()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| SensorcastError::unknown_channel(name))
    }
}

impl core::fmt::Debug for SensorRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SensorRegistry")
            .field("channels", &self.state.lock().channels)
            .field("clock", &self.clock)
            .finish()
    }
}

fn advance(channel: &mut Channel, walk: &mut RandomWalkGenerator) {
    let next = walk.step(channel.value(), channel.min(), channel.max());
    channel.set_value(next);
}
