// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! HTTP pull endpoints and WebSocket push channel over a [`sensorcast::TelemetryEngine`].

pub mod config;
pub mod error;
pub mod routes;
pub mod server;

pub use config::Args;
pub use routes::{router, AppState};
pub use server::run;
