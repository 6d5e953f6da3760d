// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use anyhow::Result;
use clap::Parser;
use sensorcast::{ChannelSpec, TelemetryEngine};
use sensorcast_server::config::{load_channels, parse_channels};
use sensorcast_server::Args;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

const TWO_CHANNELS: &str = r#"
[[channel]]
name = "temperature"
initial = 21.5
unit = "°C"
min = 10.0
max = 30.0

[[channel]]
name = "ozone"
initial = 40.0
unit = "ppb"
min = 0.0
max = 120.0
"#;

#[test]
fn test_defaults() -> Result<()> {
    let args = Args::try_parse_from(["sensorcast"])?;

    assert_eq!(args.port, 3000);
    assert_eq!(
        args.listen_addr(),
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, 3000))
    );
    assert_eq!(args.send_timeout(), Duration::from_millis(5000));

    let config = args.engine_config()?;
    assert_eq!(config.tick_interval, Duration::from_millis(2000));
    assert_eq!(config.subscriber_buffer, 16);
    assert_eq!(config.seed, None);
    let names: Vec<&str> = config.channels.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "temperature",
            "humidity",
            "pressure",
            "carbonMonoxide",
            "nitrogenDioxide"
        ]
    );
    Ok(())
}

#[test]
fn test_flags_override_defaults() -> Result<()> {
    let args = Args::try_parse_from([
        "sensorcast",
        "--port",
        "8080",
        "--bind",
        "127.0.0.1",
        "--tick-interval-ms",
        "500",
        "--subscriber-buffer",
        "4",
        "--seed",
        "99",
    ])?;

    assert_eq!(args.listen_addr(), SocketAddr::from(([127, 0, 0, 1], 8080)));
    let config = args.engine_config()?;
    assert_eq!(config.tick_interval, Duration::from_millis(500));
    assert_eq!(config.subscriber_buffer, 4);
    assert_eq!(config.seed, Some(99));
    Ok(())
}

#[test]
fn test_zero_tick_interval_is_rejected() -> Result<()> {
    let args = Args::try_parse_from(["sensorcast", "--tick-interval-ms", "0"])?;

    assert!(args.engine_config().is_err());
    Ok(())
}

#[test]
fn test_zero_subscriber_buffer_is_rejected() -> Result<()> {
    let args = Args::try_parse_from(["sensorcast", "--subscriber-buffer", "0"])?;

    assert!(args.engine_config().is_err());
    Ok(())
}

#[test]
fn test_parse_channels_file() -> Result<()> {
    let channels = parse_channels(TWO_CHANNELS)?;

    assert_eq!(
        channels,
        vec![
            ChannelSpec::new("temperature", 21.5, "°C", 10.0, 30.0),
            ChannelSpec::new("ozone", 40.0, "ppb", 0.0, 120.0),
        ]
    );
    Ok(())
}

#[test]
fn test_empty_or_malformed_channels_file_is_rejected() {
    assert!(parse_channels("").is_err());
    assert!(parse_channels("[[channel]]\nname = \"x\"\n").is_err());
    assert!(parse_channels("[[sensor]]\nname = \"x\"\n").is_err());
}

#[test]
fn test_channels_file_feeds_engine_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("channels.toml");
    std::fs::write(&path, TWO_CHANNELS)?;

    let args = Args::try_parse_from(["sensorcast", "--channels", path.to_str().expect("utf-8 path")])?;
    let engine = TelemetryEngine::new(args.engine_config()?)?;

    assert_eq!(engine.snapshots().channel_names(), ["temperature", "ozone"]);
    assert_eq!(
        engine.snapshots().get_all().get("temperature").map(|r| r.value()),
        Some(21.5)
    );
    Ok(())
}

#[test]
fn test_missing_channels_file_is_reported() {
    let err = load_channels(std::path::Path::new("/nonexistent/channels.toml")).unwrap_err();

    assert!(err.to_string().contains("failed to read channels file"));
}

#[test]
fn test_invalid_bounds_in_file_fail_at_engine_creation() -> Result<()> {
    let channels = parse_channels(
        r#"
        [[channel]]
        name = "pressure"
        initial = 1013.0
        unit = "hPa"
        min = 1030.0
        max = 1000.0
        "#,
    )?;
    let args = Args::try_parse_from(["sensorcast"])?;
    let config = sensorcast::EngineConfig {
        channels,
        ..args.engine_config()?
    };

    let err = TelemetryEngine::new(config).unwrap_err();
    assert!(err.is_fatal());
    Ok(())
}
