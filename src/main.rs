// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Linkstash server
//!
//! Serves the bookmark manager pages and proxies all persistence and
//! session work to the hosted backend.

use dashmap::DashMap;
use linkstash::{backend::HostedBackend, config::Config, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    // Missing connection parameters are a deployment error: die now, not on
    // the first request.
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Linkstash");

    let hosted =
        Arc::new(HostedBackend::new(&config).expect("Failed to initialize backend client"));
    tracing::info!(backend = %config.backend_url, "Hosted backend client initialized");

    let state = Arc::new(AppState {
        config: config.clone(),
        auth: hosted.clone(),
        store: hosted,
        controllers: DashMap::new(),
    });

    let app = linkstash::routes::create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("linkstash=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
