// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// An immutable, timestamped measurement of one channel.
///
/// Serializes as `{"value": .., "unit": .., "timestamp": ..}`; the channel
/// name is carried by the enclosing map key, not the object itself.
///
/// # Example
///
/// ```rust
/// use sensorcast_core::Reading;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap();
/// let reading = Reading::new("humidity", 61.3, "%", at);
///
/// let json = serde_json::to_string(&reading).unwrap();
/// assert_eq!(json, r#"{"value":61.3,"unit":"%","timestamp":"2025-01-01T12:00:00.000Z"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    #[serde(skip)]
    name: String,
    value: f64,
    unit: String,
    #[serde(serialize_with = "serialize_iso8601")]
    timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        unit: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            unit: unit.into(),
            timestamp,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

// Millisecond precision with a `Z` suffix, the shape browsers produce for Date#toISOString.
fn serialize_iso8601<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
