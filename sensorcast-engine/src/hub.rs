// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Multi-subscriber fan-out hub.
//!
//! A [`SubscriberHub`] delivers each broadcast payload to every connected
//! subscriber.
//!
//! ## Characteristics
//!
//! - **Join snapshot first**: [`SubscriberHub::join_with`] queues an initial
//!   payload before the subscriber becomes visible to `broadcast`, so the
//!   join payload always precedes the first broadcast it receives.
//! - **Bounded**: every subscriber owns a bounded outbound queue. Delivery
//!   uses a non-blocking `try_send`; a subscriber whose queue is full or
//!   whose receiver is gone is removed instead of stalling the others.
//! - **Thread-safe**: cheap to clone; all clones share the same membership.
//! - **Idempotent leave**: dropping a [`Subscription`] leaves the hub, and
//!   [`SubscriberHub::leave`] may be called any number of times.
//!
//! ## Example
//!
//! ```
//! use sensorcast_engine::SubscriberHub;
//! use futures::StreamExt;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let hub = SubscriberHub::<u32>::new(8);
//!
//! let mut subscription = hub.join_with(|| 0).unwrap();
//! hub.broadcast(&1);
//! hub.close();
//!
//! assert_eq!(subscription.next().await, Some(0)); // join payload
//! assert_eq!(subscription.next().await, Some(1)); // broadcast
//! assert_eq!(subscription.next().await, None); // hub closed
//! # }
//! ```

use chrono::{DateTime, Utc};
use futures::channel::mpsc::{self, Receiver, Sender};
use futures::Stream;
use parking_lot::Mutex;
use sensorcast_error::{Result, SensorcastError};
use std::collections::BTreeMap;
use std::fmt;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

/// Opaque identifier handed out by [`SubscriberHub::join_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Public view of one member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberInfo {
    pub id: SubscriberId,
    pub joined_at: DateTime<Utc>,
}

/// Outcome of one [`SubscriberHub::broadcast`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Members that accepted the payload
    pub delivered: usize,
    /// Members removed because delivery failed
    pub dropped: usize,
}

struct Member<T> {
    tx: Sender<T>,
    joined_at: DateTime<Utc>,
}

struct HubState<T> {
    closed: bool,
    members: BTreeMap<SubscriberId, Member<T>>,
}

/// Fan-out hub with bounded per-subscriber queues.
///
/// See the [module documentation](self) for details.
pub struct SubscriberHub<T> {
    state: Arc<Mutex<HubState<T>>>,
    next_id: Arc<AtomicU64>,
    buffer: usize,
}

impl<T: Clone + Send + 'static> SubscriberHub<T> {
    /// Creates an open hub whose subscribers each buffer up to `buffer`
    /// undelivered payloads.
    ///
    /// A `buffer` of zero is raised to one so the join payload always fits.
    #[must_use]
    pub fn new(buffer: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(HubState {
                closed: false,
                members: BTreeMap::new(),
            })),
            next_id: Arc::new(AtomicU64::new(1)),
            buffer: buffer.max(1),
        }
    }

    /// Registers a new subscriber and queues `initial()` as its first payload.
    ///
    /// `initial` runs while the membership lock is held, so no broadcast can
    /// slip in between the join payload and the subscriber becoming a member.
    /// Keep it short; it must not call back into the hub.
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::HubClosed`] if the hub has been closed.
    pub fn join_with<F>(&self, initial: F) -> Result<Subscription<T>>
    where
        F: FnOnce() -> T,
    {
        let mut state = self.state.lock();
        if state.closed {
            return Err(SensorcastError::HubClosed);
        }

        let id = SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed));
        // futures' bounded channel reserves one extra slot per sender
        let (mut tx, rx) = mpsc::channel(self.buffer - 1);

        if let Err(err) = tx.try_send(initial()) {
            return Err(SensorcastError::delivery_failure(id.as_u64(), err.to_string()));
        }

        state.members.insert(
            id,
            Member {
                tx,
                joined_at: Utc::now(),
            },
        );
        debug!("subscriber {id} joined ({} connected)", state.members.len());

        Ok(Subscription {
            id,
            rx,
            hub: Arc::downgrade(&self.state),
        })
    }

    /// Removes a subscriber.
    ///
    /// Returns `true` if the subscriber was a member; removing an absent
    /// subscriber is a no-op.
    pub fn leave(&self, id: SubscriberId) -> bool {
        remove_member(&self.state, id)
    }

    /// Delivers `payload` to every current member without blocking.
    ///
    /// Members whose queue is full or whose receiver has been dropped are
    /// removed; delivery to the others is unaffected. A closed hub delivers
    /// nothing.
    pub fn broadcast(&self, payload: &T) -> BroadcastReport {
        let mut state = self.state.lock();
        let mut report = BroadcastReport::default();

        state.members.retain(|id, member| match member.tx.try_send(payload.clone()) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(err) => {
                let reason = if err.is_full() {
                    "outbound queue full"
                } else {
                    "receiver disconnected"
                };
                let failure = SensorcastError::delivery_failure(id.as_u64(), reason);
                warn!("dropping subscriber: {failure}");
                report.dropped += 1;
                false
            }
        });

        report
    }

    /// Closes the hub, ending every subscription stream.
    ///
    /// After closing, `join_with` fails and `broadcast` delivers nothing.
    /// Closing is idempotent.
    pub fn close(&self) {
        let mut state = self.state.lock();
        if !state.closed {
            info!(
                "closing subscriber hub ({} connected)",
                state.members.len()
            );
        }
        state.closed = true;
        state.members.clear();
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.state.lock().members.len()
    }

    #[must_use]
    pub fn contains(&self, id: SubscriberId) -> bool {
        self.state.lock().members.contains_key(&id)
    }

    /// Current members ordered by join order.
    #[must_use]
    pub fn members(&self) -> Vec<SubscriberInfo> {
        self.state
            .lock()
            .members
            .iter()
            .map(|(id, member)| SubscriberInfo {
                id: *id,
                joined_at: member.joined_at,
            })
            .collect()
    }
}

impl<T> Clone for SubscriberHub<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            next_id: Arc::clone(&self.next_id),
            buffer: self.buffer,
        }
    }
}

impl<T> fmt::Debug for SubscriberHub<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SubscriberHub")
            .field("closed", &state.closed)
            .field("members", &state.members.len())
            .field("buffer", &self.buffer)
            .finish()
    }
}

fn remove_member<T>(state: &Mutex<HubState<T>>, id: SubscriberId) -> bool {
    let removed = state.lock().members.remove(&id).is_some();
    if removed {
        debug!("subscriber {id} left");
    }
    removed
}

/// Receiving end of one hub membership.
///
/// Yields the join payload first, then every broadcast, and ends when the
/// subscriber is removed or the hub closes. Dropping it leaves the hub.
pub struct Subscription<T> {
    id: SubscriberId,
    rx: Receiver<T>,
    hub: Weak<Mutex<HubState<T>>>,
}

impl<T> Subscription<T> {
    #[must_use]
    pub fn id(&self) -> SubscriberId {
        self.id
    }
}

impl<T> Stream for Subscription<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.rx).poll_next(cx)
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(state) = self.hub.upgrade() {
            remove_member(&state, self.id);
        }
    }
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
