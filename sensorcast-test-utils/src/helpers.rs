// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::Stream;
use std::time::Duration;
use tokio::time::sleep;

/// Waits up to `timeout_ms` for the next item.
///
/// Returns `None` on timeout or when the stream ends.
pub async fn recv_timeout<S, T>(stream: &mut S, timeout_ms: u64) -> Option<T>
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        item = stream.next() => item,
        _ = sleep(Duration::from_millis(timeout_ms)) => None,
    }
}

/// Panics if the stream yields an item within `timeout_ms`.
///
/// A stream that ends counts as yielding nothing.
pub async fn assert_no_recv<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
    T: core::fmt::Debug,
{
    tokio::select! {
        item = stream.next() => {
            if let Some(item) = item {
                panic!("Unexpected item received, expected no output: {item:?}");
            }
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {}
    }
}

/// Panics unless `value` has at most one decimal digit.
pub fn assert_one_decimal(value: f64) {
    let scaled = value * 10.0;
    assert!(
        (scaled.round() - scaled).abs() < 1e-9,
        "{value} has more than one decimal digit"
    );
}
