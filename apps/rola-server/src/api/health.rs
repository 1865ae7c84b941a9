// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Readiness response with component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall status ("ok").
    pub status: String,
    pub checks: HealthChecks,
}

/// Individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Challenges issued but not yet consumed or swept.
    pub outstanding_challenges: usize,
    /// "enabled" when keys are checked against on-ledger owner keys.
    pub owner_key_check: String,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
///
/// The challenge store lives in memory, so the service is ready as soon as it
/// serves requests. The gateway is not probed; a gateway outage fails
/// individual verifications, not readiness.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse)
    )
)]
pub async fn readiness(State(state): State<AppState>) -> Json<ReadyResponse> {
    let owner_key_check = if state.rola.owner_key_check_enabled() {
        "enabled"
    } else {
        "disabled"
    };

    Json(ReadyResponse {
        status: "ok".to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            outstanding_challenges: state.challenges.len(),
            owner_key_check: owner_key_check.to_string(),
        },
    })
}
