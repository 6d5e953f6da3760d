// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! WebSocket push channel.
//!
//! Every frame is a text message `{"event":"sensor-data","data":{..}}` where
//! `data` has the same shape as `GET /api/sensors`. The first frame carries
//! the snapshot taken at join time; one frame follows per tick.

use crate::error::ApiError;
use crate::routes::AppState;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use futures::{Sink, SinkExt, Stream, StreamExt};
use sensorcast::{SensorSnapshot, SensorcastError, SharedSnapshot, Subscription};
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Events sent to push subscribers.
#[derive(Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum PushEvent<'a> {
    SensorData(&'a SensorSnapshot),
}

impl PushEvent<'_> {
    /// Encodes the event as one text frame.
    ///
    /// # Errors
    ///
    /// Only if serialization fails, which the snapshot types never do.
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// `GET /ws`
///
/// Joins the hub before the handshake completes so the join snapshot is
/// already queued when the socket opens.
pub async fn upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    match state.engine.join() {
        Ok(subscription) => {
            let send_timeout = state.send_timeout;
            ws.on_upgrade(move |socket| session(socket, subscription, send_timeout))
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

async fn session(
    socket: WebSocket,
    subscription: Subscription<SharedSnapshot>,
    send_timeout: Duration,
) {
    let (sender, receiver) = socket.split();
    forward(sender, receiver, subscription, send_timeout).await;
}

/// Pumps hub updates into `sender` until either side goes away.
///
/// Ends when the subscription stream ends (engine stopped or subscriber
/// dropped as too slow), when a write fails or exceeds `send_timeout`, or when
/// the client closes. Dropping the subscription on return leaves the hub.
pub async fn forward<S, R, E>(
    mut sender: S,
    mut receiver: R,
    mut subscription: Subscription<SharedSnapshot>,
    send_timeout: Duration,
) where
    S: Sink<Message> + Unpin,
    S::Error: Display,
    R: Stream<Item = Result<Message, E>> + Unpin,
{
    let id = subscription.id();
    info!("subscriber {id} connected");

    loop {
        tokio::select! {
            update = subscription.next() => {
                // The hub ended the stream: engine stopped or subscriber too slow
                let Some(snapshot) = update else {
                    debug!("subscriber {id}: update stream ended");
                    break;
                };
                let frame = match PushEvent::SensorData(&snapshot).to_frame() {
                    Ok(frame) => frame,
                    Err(err) => {
                        warn!("subscriber {id}: failed to encode update: {err}");
                        break;
                    }
                };
                let sent = timeout(send_timeout, sender.send(Message::Text(frame.into()))).await;
                let failure = match sent {
                    Ok(Ok(())) => continue,
                    Ok(Err(err)) => SensorcastError::delivery_failure(id.as_u64(), err.to_string()),
                    Err(_) => SensorcastError::timeout(format!("send to subscriber {id}"), send_timeout),
                };
                warn!("{failure}");
                break;
            }
            incoming = receiver.next() => {
                match incoming {
                    Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                    // Inbound messages carry no meaning on this channel
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    let _ = timeout(send_timeout, sender.close()).await;
    info!("subscriber {id} disconnected");
}
