// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Fixed-period tick source.
//!
//! A [`TickScheduler`] drives one callback on a fixed period from a single
//! background task:
//!
//! - the first tick fires one full period after [`TickScheduler::start`];
//! - ticks never overlap: the callback runs to completion before the next
//!   tick is considered, and a tick whose deadline passed while the previous
//!   callback was still running is skipped rather than run late;
//! - a callback error is logged and the schedule continues;
//! - [`TickScheduler::stop`] cancels the task and waits for it, so no tick
//!   fires after it returns.

use sensorcast_error::{Result, SensorcastError};
use std::fmt::Display;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Default period between ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

#[derive(Debug, Default)]
struct TickCounters {
    fired: AtomicU64,
    skipped: AtomicU64,
}

#[derive(Debug)]
pub struct TickScheduler {
    period: Duration,
    cancel_token: CancellationToken,
    task_handle: Option<JoinHandle<()>>,
    counters: Arc<TickCounters>,
}

impl TickScheduler {
    /// Creates a stopped scheduler.
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::InvalidState`] if `period` is zero.
    pub fn new(period: Duration) -> Result<Self> {
        if period.is_zero() {
            return Err(SensorcastError::invalid_state(
                "tick interval must be greater than zero",
            ));
        }
        Ok(Self {
            period,
            cancel_token: CancellationToken::new(),
            task_handle: None,
            counters: Arc::new(TickCounters::default()),
        })
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[must_use]
    pub fn state(&self) -> SchedulerState {
        if self.task_handle.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Number of ticks whose callback has been invoked.
    #[must_use]
    pub fn ticks_fired(&self) -> u64 {
        self.counters.fired.load(Ordering::Acquire)
    }

    /// Number of tick deadlines that passed while a previous callback was
    /// still running, counted one per deadline.
    #[must_use]
    pub fn ticks_skipped(&self) -> u64 {
        self.counters.skipped.load(Ordering::Acquire)
    }

    /// Spawns the tick loop on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`SensorcastError::InvalidState`] if the scheduler is already running.
    pub fn start<F, Fut, E>(&mut self, on_tick: F) -> Result<()>
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        if self.task_handle.is_some() {
            return Err(SensorcastError::invalid_state("scheduler is already running"));
        }

        // A fresh token per run so a stopped scheduler can be started again
        self.cancel_token = CancellationToken::new();
        let cancel_token = self.cancel_token.clone();
        let counters = Arc::clone(&self.counters);
        let period = self.period;

        let handle = tokio::spawn(async move {
            Self::run(period, on_tick, counters, cancel_token).await;
        });
        self.task_handle = Some(handle);
        Ok(())
    }

    /// Cancels the tick loop and waits for it to finish.
    ///
    /// A callback already in flight is abandoned at its next await point.
    /// Stopping a stopped scheduler is a no-op.
    pub async fn stop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            self.cancel_token.cancel();
            let _ = handle.await;
        }
    }

    async fn run<F, Fut, E>(
        period: Duration,
        mut on_tick: F,
        counters: Arc<TickCounters>,
        cancel_token: CancellationToken,
    ) where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = std::result::Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_finished: Option<Instant> = None;

        debug!("tick scheduler started with period {period:?}");

        loop {
            select! {
                biased;
                _ = cancel_token.cancelled() => {
                    break;
                }
                deadline = ticker.tick() => {
                    if let Some(finished) = last_finished.filter(|finished| *finished > deadline) {
                        // The interval folds every deadline that passed during the overrun into one
                        let missed = missed_deadlines(deadline, finished, period);
                        counters.skipped.fetch_add(missed, Ordering::AcqRel);
                        debug!("skipping {missed} tick(s) from {deadline:?}: previous tick still running");
                        continue;
                    }

                    counters.fired.fetch_add(1, Ordering::AcqRel);
                    select! {
                        biased;
                        _ = cancel_token.cancelled() => {
                            break;
                        }
                        result = on_tick() => {
                            if let Err(err) = result {
                                error!("tick callback failed: {err}");
                            }
                        }
                    }
                    last_finished = Some(Instant::now());
                }
            }
        }

        debug!("tick scheduler stopped");
    }
}

/// Deadlines `first`, `first + period`, ... that are not after `finished`.
fn missed_deadlines(first: Instant, finished: Instant, period: Duration) -> u64 {
    let overrun = finished.saturating_duration_since(first).as_nanos();
    u64::try_from(overrun / period.as_nanos()).map_or(u64::MAX, |n| n.saturating_add(1))
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}
