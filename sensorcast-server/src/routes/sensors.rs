// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::error::ApiError;
use crate::routes::AppState;
use axum::extract::{Path, State};
use axum::Json;
use sensorcast::{Reading, SensorSnapshot};

/// `GET /api/sensors`
pub async fn all(State(state): State<AppState>) -> Json<SensorSnapshot> {
    Json(state.engine.snapshots().get_all())
}

/// `GET /api/sensors/{name}`
///
/// Each call advances the named channel before answering.
pub async fn one(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Reading>, ApiError> {
    let reading = state.engine.snapshots().get_one(&name)?;
    tracing::debug!("served {name} = {} {}", reading.value(), reading.unit());
    Ok(Json(reading))
}
