// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use sensorcast_engine::{SchedulerState, TickScheduler};
use sensorcast_error::SensorcastError;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{advance, sleep};

const PERIOD: Duration = Duration::from_millis(2000);

// Lets spawned tasks observe a clock change without moving the paused clock.
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

fn counting_scheduler(counter: &Arc<AtomicUsize>) -> TickScheduler {
    let mut scheduler = TickScheduler::new(PERIOD).unwrap();
    let counter = Arc::clone(counter);
    scheduler
        .start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), Infallible>(()) }
        })
        .unwrap();
    scheduler
}

#[tokio::test(start_paused = true)]
async fn test_three_periods_fire_exactly_three_ticks() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut scheduler = counting_scheduler(&counter);
    settle().await;

    for _ in 0..3 {
        advance(PERIOD).await;
        settle().await;
    }

    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert_eq!(scheduler.ticks_fired(), 3);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_first_tick_waits_one_full_period() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut scheduler = counting_scheduler(&counter);
    settle().await;

    advance(PERIOD - Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(counter.load(Ordering::SeqCst), 0);

    advance(Duration::from_millis(1)).await;
    settle().await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_no_ticks_after_stop() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut scheduler = counting_scheduler(&counter);
    settle().await;

    advance(PERIOD).await;
    settle().await;
    scheduler.stop().await;
    assert_eq!(scheduler.state(), SchedulerState::Stopped);

    advance(PERIOD * 5).await;
    settle().await;
    assert_eq!(counter.load(Ordering::SeqCst), 1);

    // Stopping again is harmless
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_failing_callback_does_not_stop_schedule() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let mut scheduler = TickScheduler::new(PERIOD).unwrap();
    let counter = Arc::clone(&attempts);
    scheduler
        .start(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(SensorcastError::invalid_state("sensor offline")) }
        })
        .unwrap();
    settle().await;

    for _ in 0..4 {
        advance(PERIOD).await;
        settle().await;
    }

    assert_eq!(attempts.load(Ordering::SeqCst), 4);
    assert_eq!(scheduler.state(), SchedulerState::Running);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_overrunning_tick_skips_instead_of_overlapping() {
    let started = Arc::new(AtomicUsize::new(0));
    let running = Arc::new(AtomicUsize::new(0));
    let mut scheduler = TickScheduler::new(PERIOD).unwrap();
    {
        let started = Arc::clone(&started);
        let running = Arc::clone(&running);
        scheduler
            .start(move || {
                let started = Arc::clone(&started);
                let running = Arc::clone(&running);
                async move {
                    started.fetch_add(1, Ordering::SeqCst);
                    assert_eq!(running.fetch_add(1, Ordering::SeqCst), 0, "ticks overlapped");
                    sleep(Duration::from_millis(2500)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    Ok::<(), Infallible>(())
                }
            })
            .unwrap();
    }

    // Ticks due at 2000 (runs until 4500), 4000 (skipped), 6000 (runs until 8500)
    sleep(Duration::from_millis(8100)).await;

    assert_eq!(started.load(Ordering::SeqCst), 2);
    assert_eq!(scheduler.ticks_skipped(), 1);
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_long_overrun_counts_every_missed_deadline() {
    let started = Arc::new(AtomicUsize::new(0));
    let mut scheduler = TickScheduler::new(PERIOD).unwrap();
    {
        let started = Arc::clone(&started);
        scheduler
            .start(move || {
                started.fetch_add(1, Ordering::SeqCst);
                async {
                    sleep(Duration::from_millis(6500)).await;
                    Ok::<(), Infallible>(())
                }
            })
            .unwrap();
    }

    // Tick at 2000 runs until 8500: deadlines 4000, 6000 and 8000 are missed, 10000 fires
    sleep(Duration::from_millis(10100)).await;

    assert_eq!(started.load(Ordering::SeqCst), 2);
    assert_eq!(scheduler.ticks_fired(), 2);
    assert_eq!(scheduler.ticks_skipped(), 3);
    scheduler.stop().await;
}

#[tokio::test]
async fn test_start_twice_is_rejected() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut scheduler = counting_scheduler(&counter);

    let err = scheduler
        .start(|| async { Ok::<(), Infallible>(()) })
        .unwrap_err();

    assert!(matches!(err, SensorcastError::InvalidState { .. }));
    scheduler.stop().await;
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut scheduler = counting_scheduler(&counter);
    scheduler.stop().await;

    let again = Arc::clone(&counter);
    scheduler
        .start(move || {
            again.fetch_add(1, Ordering::SeqCst);
            async { Ok::<(), Infallible>(()) }
        })
        .unwrap();
    settle().await;
    advance(PERIOD).await;
    settle().await;

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    scheduler.stop().await;
}

#[test]
fn test_zero_period_is_rejected() {
    let err = TickScheduler::new(Duration::ZERO).unwrap_err();
    assert!(matches!(err, SensorcastError::InvalidState { .. }));
}
