// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Command-line and environment configuration.

use anyhow::{bail, Context, Result};
use clap::Parser;
use sensorcast::{default_channels, ChannelSpec, EngineConfig};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "sensorcast")]
#[command(about = "Simulated environmental telemetry over HTTP and WebSocket")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "SENSORCAST_BIND", default_value = "0.0.0.0")]
    pub bind: IpAddr,

    /// Milliseconds between generation ticks
    #[arg(long, env = "TICK_INTERVAL_MS", default_value_t = 2000)]
    pub tick_interval_ms: u64,

    /// Outbound queue depth per subscriber before it is dropped as too slow
    #[arg(long, env = "SUBSCRIBER_BUFFER", default_value_t = 16)]
    pub subscriber_buffer: usize,

    /// Upper bound on a single WebSocket write, in milliseconds
    #[arg(long, env = "SEND_TIMEOUT_MS", default_value_t = 5000)]
    pub send_timeout_ms: u64,

    /// TOML file with `[[channel]]` definitions (defaults to the built-in five)
    #[arg(long, env = "SENSORCAST_CHANNELS")]
    pub channels: Option<PathBuf>,

    /// Directory served as static files for unmatched paths
    #[arg(long, env = "SENSORCAST_STATIC_DIR")]
    pub static_dir: Option<PathBuf>,

    /// Seed for a reproducible random walk
    #[arg(long, env = "SENSORCAST_SEED")]
    pub seed: Option<u64>,
}

impl Args {
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    #[must_use]
    pub fn send_timeout(&self) -> Duration {
        Duration::from_millis(self.send_timeout_ms)
    }

    /// Builds the engine configuration, reading the channels file if one was given.
    ///
    /// Channel bounds are validated later, when the engine is created.
    ///
    /// # Errors
    ///
    /// Fails on a zero tick interval or subscriber buffer, or when the
    /// channels file cannot be read or parsed.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        if self.tick_interval_ms == 0 {
            bail!("--tick-interval-ms must be greater than zero");
        }
        if self.subscriber_buffer == 0 {
            bail!("--subscriber-buffer must be greater than zero");
        }

        let channels = match &self.channels {
            Some(path) => load_channels(path)?,
            None => default_channels(),
        };

        Ok(EngineConfig {
            channels,
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            subscriber_buffer: self.subscriber_buffer,
            seed: self.seed,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChannelsFile {
    #[serde(default)]
    channel: Vec<ChannelSpec>,
}

/// Parses channel definitions from TOML text.
///
/// # Errors
///
/// Fails on malformed TOML or an empty channel list.
pub fn parse_channels(text: &str) -> Result<Vec<ChannelSpec>> {
    let file: ChannelsFile = toml::from_str(text).context("invalid channels file")?;
    if file.channel.is_empty() {
        bail!("channels file defines no [[channel]] entries");
    }
    Ok(file.channel)
}

/// Reads and parses a channels file.
///
/// # Errors
///
/// Fails when the file cannot be read or [`parse_channels`] rejects it.
pub fn load_channels(path: &Path) -> Result<Vec<ChannelSpec>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read channels file {}", path.display()))?;
    parse_channels(&text).with_context(|| format!("in {}", path.display()))
}
