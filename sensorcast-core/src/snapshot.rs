// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::reading::Reading;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// One reading per registered channel, all generated at the same instant.
///
/// Readings keep registration order. Serializes as a JSON object keyed by
/// channel name.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorSnapshot {
    generated_at: DateTime<Utc>,
    readings: Vec<Reading>,
}

impl SensorSnapshot {
    pub(crate) fn new(generated_at: DateTime<Utc>, readings: Vec<Reading>) -> Self {
        Self {
            generated_at,
            readings,
        }
    }

    /// The generation instant shared by every reading.
    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Looks up the reading of one channel.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Reading> {
        self.readings.iter().find(|reading| reading.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Reading> {
        self.readings.iter()
    }

    #[must_use]
    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Returns `true` when both snapshots carry the same values per channel,
    /// ignoring timestamps.
    #[must_use]
    pub fn same_values(&self, other: &Self) -> bool {
        self.readings.len() == other.readings.len()
            && self
                .readings
                .iter()
                .zip(other.readings.iter())
                .all(|(a, b)| a.name() == b.name() && a.value() == b.value())
    }
}

impl<'a> IntoIterator for &'a SensorSnapshot {
    type Item = &'a Reading;
    type IntoIter = core::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}

impl Serialize for SensorSnapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.readings.len()))?;
        for reading in &self.readings {
            map.serialize_entry(reading.name(), reading)?;
        }
        map.end()
    }
}
