// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sensorcast::SensorcastError;
use serde_json::json;

/// Maps engine errors onto HTTP responses with a JSON `error` body.
#[derive(Debug)]
pub struct ApiError(pub SensorcastError);

impl From<SensorcastError> for ApiError {
    fn from(err: SensorcastError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_client_error() {
            return (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": "Sensor not found" })),
            )
                .into_response();
        }

        tracing::error!("request failed: {}", self.0);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": self.0.to_string() })),
        )
            .into_response()
    }
}
