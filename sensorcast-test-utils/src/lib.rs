// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities and fixtures for the sensorcast workspace.
//!
//! Designed for development and testing only, not for production code.
//!
//! - [`fixtures`]: seeded registries and channel definitions
//! - [`ManualClock`]: a timestamp source tests can move by hand
//! - [`helpers`]: async receive/no-receive assertions and value checks

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
pub mod clock;
pub mod fixtures;
pub mod helpers;

pub use clock::ManualClock;
pub use fixtures::{narrow_channel, seeded_registry, temperature_only};
pub use helpers::{assert_no_recv, assert_one_decimal, recv_timeout};
