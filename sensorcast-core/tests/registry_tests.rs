// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use chrono::{DateTime, Duration, TimeZone, Utc};
use parking_lot::Mutex;
use sensorcast_core::{
    default_channels, ChannelSpec, Clock, RandomWalkGenerator, SensorRegistry, SensorcastError,
    SnapshotService,
};
use std::sync::Arc;
use std::thread;

// Each call to `now` moves one second forward so distinct calls are distinguishable.
#[derive(Debug)]
struct SteppingClock {
    next: Mutex<DateTime<Utc>>,
}

impl SteppingClock {
    fn new() -> Self {
        Self {
            next: Mutex::new(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut next = self.next.lock();
        let now = *next;
        *next = now + Duration::seconds(1);
        now
    }
}

fn seeded_registry(seed: u64) -> SensorRegistry {
    SensorRegistry::with_generator(
        default_channels(),
        RandomWalkGenerator::seeded(seed),
        Arc::new(SteppingClock::new()),
    )
    .unwrap()
}

fn has_at_most_one_decimal(value: f64) -> bool {
    ((value * 10.0).round() - value * 10.0).abs() < 1e-9
}

#[test]
fn test_advance_one_stays_within_bounds() {
    let registry = seeded_registry(3);

    for _ in 0..2_000 {
        let reading = registry.advance_one("carbonMonoxide").unwrap();
        assert!((0.0..=50.0).contains(&reading.value()));
        assert!(has_at_most_one_decimal(reading.value()));
        assert_eq!(reading.unit(), "ppm");
    }
}

#[test]
fn test_advance_one_unknown_channel() {
    let registry = seeded_registry(3);

    let err = registry.advance_one("radon").unwrap_err();
    assert!(matches!(err, SensorcastError::UnknownChannel { ref name } if name == "radon"));
}

#[test]
fn test_advance_one_moves_only_the_named_channel() {
    let registry = seeded_registry(5);
    let before = registry.current_snapshot();

    registry.advance_one("humidity").unwrap();
    let after = registry.current_snapshot();

    for name in ["temperature", "pressure", "carbonMonoxide", "nitrogenDioxide"] {
        assert_eq!(
            before.get(name).unwrap().value(),
            after.get(name).unwrap().value()
        );
    }
}

#[test]
fn test_advance_all_one_reading_per_channel_sharing_timestamp() {
    let registry = seeded_registry(11);

    let snapshot = registry.advance_all();

    assert_eq!(snapshot.len(), registry.len());
    let names: Vec<&str> = snapshot.iter().map(|reading| reading.name()).collect();
    assert_eq!(
        names,
        vec![
            "temperature",
            "humidity",
            "pressure",
            "carbonMonoxide",
            "nitrogenDioxide"
        ]
    );
    assert!(snapshot
        .iter()
        .all(|reading| reading.timestamp() == snapshot.generated_at()));
}

#[test]
fn test_current_snapshot_does_not_advance() {
    let registry = seeded_registry(13);
    registry.advance_all();

    let first = registry.current_snapshot();
    let second = registry.current_snapshot();

    assert!(first.same_values(&second));
    // Stamped with the query time, not the time of the last tick
    assert!(second.generated_at() > first.generated_at());
}

#[test]
fn test_initial_snapshot_reports_configured_values() {
    let registry = seeded_registry(17);
    let snapshot = registry.current_snapshot();

    let temperature = snapshot.get("temperature").unwrap();
    assert_eq!(temperature.value(), 25.0);
    assert_eq!(temperature.unit(), "°C");
    assert_eq!(snapshot.get("pressure").unwrap().value(), 1013.0);
}

#[test]
fn test_thousand_ticks_stay_in_bounds_and_keep_moving() {
    let registry = seeded_registry(2025);
    let bounds: Vec<(String, f64, f64)> = default_channels()
        .into_iter()
        .map(|spec| (spec.name, spec.min, spec.max))
        .collect();

    let mut previous = registry.current_snapshot();
    let mut identical_pairs = 0;

    for _ in 0..1_000 {
        let snapshot = registry.advance_all();

        for (name, min, max) in &bounds {
            let value = snapshot.get(name).unwrap().value();
            assert!(value >= *min && value <= *max, "{name}={value} escaped bounds");
            assert!(has_at_most_one_decimal(value));
        }

        if snapshot.same_values(&previous) {
            identical_pairs += 1;
        }
        previous = snapshot;
    }

    // Five independent channels almost never all repeat; a stuck walk would repeat every time
    assert!(identical_pairs < 10, "walk looks degenerate: {identical_pairs} repeats");
}

#[test]
fn test_rejects_duplicate_names() {
    let mut specs = default_channels();
    specs.push(ChannelSpec::new("humidity", 50.0, "%", 0.0, 100.0));

    let err = SensorRegistry::new(specs).unwrap_err();
    assert!(matches!(err, SensorcastError::DuplicateChannel { ref name } if name == "humidity"));
    assert!(err.is_fatal());
}

#[test]
fn test_rejects_invalid_bounds() {
    let specs = vec![ChannelSpec::new("temperature", 25.0, "°C", 35.0, 15.0)];

    let err = SensorRegistry::new(specs).unwrap_err();
    assert!(matches!(err, SensorcastError::GenerationFault { .. }));
}

#[test]
fn test_rejects_empty_configuration() {
    let err = SensorRegistry::new(Vec::new()).unwrap_err();
    assert!(matches!(err, SensorcastError::InvalidState { .. }));
}

#[test]
fn test_concurrent_readers_see_whole_ticks() {
    let registry = Arc::new(seeded_registry(99));
    let writer = {
        let registry = Arc::clone(&registry);
        thread::spawn(move || {
            for _ in 0..500 {
                registry.advance_all();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for _ in 0..500 {
                    let snapshot = registry.current_snapshot();
                    assert_eq!(snapshot.len(), 5);
                    assert!(snapshot
                        .iter()
                        .all(|reading| reading.timestamp() == snapshot.generated_at()));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[test]
fn test_snapshot_service_get_one_advances() -> anyhow::Result<()> {
    let registry = Arc::new(seeded_registry(21));
    let service = SnapshotService::new(Arc::clone(&registry));

    let reading = service.get_one("temperature")?;
    assert!((15.0..=35.0).contains(&reading.value()));
    assert_eq!(reading.unit(), "°C");
    assert_eq!(
        registry.channel("temperature").map(|channel| channel.value()),
        Some(reading.value())
    );

    assert!(service.get_one("unknown").unwrap_err().is_client_error());
    Ok(())
}

#[test]
fn test_snapshot_service_get_all_is_read_only() {
    let registry = Arc::new(seeded_registry(23));
    let service = SnapshotService::new(Arc::clone(&registry));

    let first = service.get_all();
    let second = service.get_all();

    assert!(first.same_values(&second));
    assert_eq!(service.channel_names().len(), 5);
}
