// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the sensorcast telemetry service
//!
//! Every fallible operation in the workspace returns [`SensorcastError`]. The
//! variants fall into three groups:
//!
//! - **client errors** ([`SensorcastError::UnknownChannel`]) are reported back to
//!   the caller and never affect the engine;
//! - **recoverable errors** ([`SensorcastError::DeliveryFailure`],
//!   [`SensorcastError::Timeout`]) are handled locally by dropping one subscriber;
//! - **fatal errors** ([`SensorcastError::GenerationFault`],
//!   [`SensorcastError::DuplicateChannel`]) reject a channel configuration at
//!   startup, before the engine ever runs.
//!
//! # Examples
//!
//! ```
//! use sensorcast_error::{Result, SensorcastError};
//!
//! fn lookup(name: &str) -> Result<f64> {
//!     Err(SensorcastError::unknown_channel(name))
//! }
//!
//! let err = lookup("radon").unwrap_err();
//! assert!(err.is_client_error());
//! ```

use std::time::Duration;

/// Root error type for all sensorcast operations
#[derive(Debug, thiserror::Error)]
pub enum SensorcastError {
    /// A query or advance request named a channel that is not registered
    #[error("Unknown channel: {name}")]
    UnknownChannel {
        /// The name that was looked up
        name: String,
    },

    /// A subscriber could not accept a payload
    ///
    /// The hub recovers by removing the subscriber; the error never reaches
    /// other subscribers or the tick cycle.
    #[error("Delivery to subscriber {subscriber} failed: {reason}")]
    DeliveryFailure {
        /// Identifier of the subscriber that failed
        subscriber: u64,
        /// Why delivery failed (queue full, receiver gone, ...)
        reason: String,
    },

    /// A channel definition cannot drive a bounded random walk
    ///
    /// Raised while validating configuration, e.g. `min >= max` or an
    /// initial value outside the bounds.
    #[error("Invalid configuration for channel '{channel}': {reason}")]
    GenerationFault {
        /// Name of the offending channel
        channel: String,
        /// Description of the violated constraint
        reason: String,
    },

    /// Two channel definitions share the same name
    #[error("Channel '{name}' is registered more than once")]
    DuplicateChannel {
        /// The duplicated name
        name: String,
    },

    /// An operation was attempted in the wrong lifecycle state
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the invalid state
        message: String,
    },

    /// The subscriber hub has been closed and accepts no new members
    #[error("Subscriber hub is closed")]
    HubClosed,

    /// An operation did not complete within its time bound
    #[error("Operation timed out after {duration:?}: {operation}")]
    Timeout {
        /// The operation that timed out
        operation: String,
        /// How long we waited
        duration: Duration,
    },
}

impl SensorcastError {
    /// Create an unknown channel error for the given name
    pub fn unknown_channel(name: impl Into<String>) -> Self {
        Self::UnknownChannel { name: name.into() }
    }

    /// Create a delivery failure for the given subscriber
    pub fn delivery_failure(subscriber: u64, reason: impl Into<String>) -> Self {
        Self::DeliveryFailure {
            subscriber,
            reason: reason.into(),
        }
    }

    /// Create a generation fault for a misconfigured channel
    pub fn generation_fault(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::GenerationFault {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate channel error
    pub fn duplicate_channel(name: impl Into<String>) -> Self {
        Self::DuplicateChannel { name: name.into() }
    }

    /// Create an invalid state error with the given message
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Check if this error should be reported to the caller as a bad request
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::UnknownChannel { .. })
    }

    /// Check if this error is handled by dropping a single subscriber
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::DeliveryFailure { .. } | Self::Timeout { .. })
    }

    /// Check if this error must abort startup
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::GenerationFault { .. } | Self::DuplicateChannel { .. }
        )
    }
}

/// Specialized Result type for sensorcast operations
pub type Result<T> = std::result::Result<T, SensorcastError>;
