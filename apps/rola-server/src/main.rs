// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use rola_server::{
    api::router,
    config::{LogFormat, RolaConfig, DEFAULT_LOG_FILTER},
    rola::{ChallengeStore, GatewayService, Rola},
    state::AppState,
    sweeper::ChallengeSweeper,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing(LogFormat::from_env());

    let config = match RolaConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };

    let challenges = Arc::new(ChallengeStore::with_ttl(config.challenge_ttl));
    let challenges_ttl = challenges.ttl();
    let mut rola = Rola::new(
        challenges.clone(),
        config.dapp_definition_address.clone(),
        config.expected_origin.clone(),
    );

    if let Some(gateway_url) = &config.gateway_url {
        let gateway = GatewayService::new(gateway_url.as_str())
            .expect("Failed to create gateway HTTP client");
        tracing::info!(gateway = %gateway_url, "Owner key check enabled");
        rola = rola.with_owner_key_lookup(Arc::new(gateway));
    }

    let shutdown = CancellationToken::new();
    let sweeper = tokio::spawn(
        ChallengeSweeper::new(challenges)
            .with_interval(config.sweep_interval)
            .run(shutdown.clone()),
    );

    let app = router(AppState::new(rola));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to read bound address");

    tracing::info!(
        %addr,
        dapp_definition_address = %config.dapp_definition_address,
        expected_origin = %config.expected_origin,
        challenge_ttl_secs = challenges_ttl.as_secs(),
        "ROLA server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await
        .expect("HTTP server failed");

    shutdown.cancel();
    if let Err(e) = sweeper.await {
        tracing::warn!(error = %e, "Challenge sweeper task failed");
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutdown signal received");
        }
        _ = shutdown.cancelled() => {}
    }
}
