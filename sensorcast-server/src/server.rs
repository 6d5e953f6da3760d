// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::config::Args;
use crate::routes::{router, AppState};
use anyhow::{Context, Result};
use sensorcast::TelemetryEngine;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Validates configuration, starts the engine and serves until Ctrl-C.
///
/// On shutdown the engine is stopped first, which ends every push
/// subscription, and only then does the server drain its connections.
///
/// # Errors
///
/// Fails on invalid configuration, when the listener cannot bind, or when the
/// server stops on its own.
pub async fn run(args: Args) -> Result<()> {
    let config = args.engine_config()?;
    let mut engine = TelemetryEngine::new(config).context("invalid engine configuration")?;

    let state = AppState::new(engine.handle(), args.send_timeout());
    let app = router(state, args.static_dir.as_deref());

    let addr = args.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    info!("sensorcast listening on http://{local}");
    info!("  Sensors:   http://{local}/api/sensors");
    info!("  WebSocket: ws://{local}/ws");
    if let Some(dir) = &args.static_dir {
        info!("  Static:    {}", dir.display());
    }

    engine.start()?;

    let shutdown = CancellationToken::new();
    let mut server = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
        }
    });

    tokio::select! {
        joined = &mut server => {
            engine.stop().await;
            joined.context("server task panicked")??;
            anyhow::bail!("server terminated unexpectedly");
        }
        () = shutdown_signal() => {
            info!("shutdown requested");
        }
    }

    engine.stop().await;
    shutdown.cancel();
    server.await.context("server task panicked")??;
    info!("sensorcast stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl-C: {err}");
        std::future::pending::<()>().await;
    }
}
