// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
#[macro_use]
mod logging;

pub mod engine;
pub mod hub;
pub mod scheduler;

// Re-export commonly used types
pub use engine::{EngineConfig, EngineHandle, EngineState, SharedSnapshot, TelemetryEngine};
pub use hub::{BroadcastReport, SubscriberHub, SubscriberId, SubscriberInfo, Subscription};
pub use scheduler::{SchedulerState, TickScheduler};
