// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::reading::Reading;
use crate::registry::SensorRegistry;
use crate::snapshot::SensorSnapshot;
use sensorcast_error::Result;
use std::sync::Arc;

/// Pull-side query surface over a shared [`SensorRegistry`].
///
/// Cheap to clone; all clones read the same registry.
#[derive(Debug, Clone)]
pub struct SnapshotService {
    registry: Arc<SensorRegistry>,
}

impl SnapshotService {
    #[must_use]
    pub fn new(registry: Arc<SensorRegistry>) -> Self {
        Self { registry }
    }

    /// Current values of every channel. Does not advance state.
    #[must_use]
    pub fn get_all(&self) -> SensorSnapshot {
        self.registry.current_snapshot()
    }

    /// Advances the named channel and returns its fresh reading.
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::UnknownChannel`](crate::SensorcastError::UnknownChannel)
    /// if `name` is not registered.
    pub fn get_one(&self, name: &str) -> Result<Reading> {
        self.registry.advance_one(name)
    }

    #[must_use]
    pub fn channel_names(&self) -> Vec<String> {
        self.registry.channel_names()
    }
}
