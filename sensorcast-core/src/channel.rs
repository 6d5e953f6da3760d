// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Channel definitions and live channel state.

use crate::random_walk::{apply_step, ceil_to_tenth, floor_to_tenth};
use crate::reading::Reading;
use chrono::{DateTime, Utc};
use sensorcast_error::{Result, SensorcastError};
use serde::{Deserialize, Serialize};

/// Static definition of one sensor channel, as read from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub name: String,
    pub initial: f64,
    pub unit: String,
    pub min: f64,
    pub max: f64,
}

impl ChannelSpec {
    pub fn new(
        name: impl Into<String>,
        initial: f64,
        unit: impl Into<String>,
        min: f64,
        max: f64,
    ) -> Self {
        Self {
            name: name.into(),
            initial,
            unit: unit.into(),
            min,
            max,
        }
    }

    /// Checks that the definition can drive a bounded random walk.
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::GenerationFault`] if the name is empty, any
    /// number is not finite, `min >= max`, the initial value lies outside
    /// `[min, max]`, or no one-decimal value fits inside the bounds.
    pub fn validate(&self) -> Result<()> {
        let fault = |reason: String| Err(SensorcastError::generation_fault(&self.name, reason));

        if self.name.trim().is_empty() {
            return fault("channel name must not be empty".to_string());
        }
        if !(self.initial.is_finite() && self.min.is_finite() && self.max.is_finite()) {
            return fault("initial, min and max must be finite numbers".to_string());
        }
        if self.min >= self.max {
            return fault(format!(
                "min ({}) must be strictly below max ({})",
                self.min, self.max
            ));
        }
        if self.initial < self.min || self.initial > self.max {
            return fault(format!(
                "initial value {} lies outside [{}, {}]",
                self.initial, self.min, self.max
            ));
        }
        if ceil_to_tenth(self.min) > floor_to_tenth(self.max) {
            return fault(format!(
                "no one-decimal value fits inside [{}, {}]",
                self.min, self.max
            ));
        }
        Ok(())
    }
}

/// Live state of one registered channel.
///
/// Only [`SensorRegistry`](crate::SensorRegistry) mutates `value`; it always
/// satisfies `min <= value <= max`.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    name: String,
    value: f64,
    unit: String,
    min: f64,
    max: f64,
}

impl Channel {
    /// Builds a channel from a definition.
    ///
    /// The initial value is rounded to one decimal place the same way a step
    /// is, so even the first snapshot never carries a finer value.
    ///
    /// # Errors
    ///
    /// Returns the validation error of [`ChannelSpec::validate`].
    pub fn from_spec(spec: ChannelSpec) -> Result<Self> {
        spec.validate()?;
        Ok(Self {
            value: apply_step(spec.initial, spec.min, spec.max, 0.0),
            name: spec.name,
            unit: spec.unit,
            min: spec.min,
            max: spec.max,
        })
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
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    pub(crate) fn set_value(&mut self, value: f64) {
        debug_assert!(value >= self.min && value <= self.max);
        self.value = value;
    }

    pub(crate) fn reading_at(&self, timestamp: DateTime<Utc>) -> Reading {
        Reading::new(self.name.clone(), self.value, self.unit.clone(), timestamp)
    }
}

/// The five environmental channels the service starts with when no
/// configuration file is given, in registration order.
#[must_use]
pub fn default_channels() -> Vec<ChannelSpec> {
    vec![
        ChannelSpec::new("temperature", 25.0, "°C", 15.0, 35.0),
        ChannelSpec::new("humidity", 60.0, "%", 30.0, 80.0),
        ChannelSpec::new("pressure", 1013.0, "hPa", 1000.0, 1030.0),
        ChannelSpec::new("carbonMonoxide", 5.0, "ppm", 0.0, 50.0),
        ChannelSpec::new("nitrogenDioxide", 10.0, "ppb", 0.0, 100.0),
    ]
}
