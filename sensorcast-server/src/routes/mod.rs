// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! HTTP surface.
//!
//! | Path | Description |
//! |------|-------------|
//! | `GET /api/sensors` | every channel, keyed by name |
//! | `GET /api/sensors/{name}` | one channel, advanced by one step |
//! | `GET /ws` | WebSocket push of `sensor-data` events |
//! | `GET /health` | liveness and subscriber count |
//!
//! When a static directory is configured, `GET /mobile` serves its
//! `mobile.html` and anything else falls through to the directory itself.

pub mod health;
pub mod push;
pub mod sensors;

use axum::routing::get;
use axum::Router;
use sensorcast::EngineHandle;
use std::path::Path;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

/// Shared state passed to all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: EngineHandle,
    /// Bound on one WebSocket write before the subscriber is dropped.
    pub send_timeout: Duration,
}

impl AppState {
    #[must_use]
    pub fn new(engine: EngineHandle, send_timeout: Duration) -> Self {
        Self {
            engine,
            send_timeout,
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api = Router::new()
        .route("/api/sensors", get(sensors::all))
        .route("/api/sensors/{name}", get(sensors::one))
        .route("/ws", get(push::upgrade))
        .route("/health", get(health::health))
        .with_state(state);

    let app = match static_dir {
        Some(dir) => api
            .route_service("/mobile", ServeFile::new(dir.join("mobile.html")))
            .fallback_service(ServeDir::new(dir)),
        None => api,
    };

    app.layer(CorsLayer::permissive())
}
