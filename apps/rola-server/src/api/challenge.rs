// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, Json};

use crate::{error::ApiError, models::ChallengeResponse, state::AppState};

#[utoipa::path(
    get,
    path = "/create-challenge",
    tag = "ROLA",
    responses(
        (status = 200, description = "Single-use challenge issued", body = ChallengeResponse),
        (status = 500, description = "Secure random source unavailable")
    )
)]
pub async fn create_challenge(
    State(state): State<AppState>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let challenge = state.challenges.create().map_err(|e| {
        if e.is_fatal() {
            tracing::error!(error_code = e.error_code(), error = %e, "Challenge issuance failed");
        } else {
            tracing::warn!(error_code = e.error_code(), error = %e, "Challenge issuance failed");
        }
        ApiError::internal("Internal server error")
    })?;

    tracing::debug!(outstanding = state.challenges.len(), "Issued challenge");
    Ok(Json(ChallengeResponse { challenge }))
}
