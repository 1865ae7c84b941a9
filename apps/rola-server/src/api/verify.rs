// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{models::VerifyResponse, rola::SignedChallenge, state::AppState};

/// Verify a set of signed challenges.
///
/// Always answers 200. Any failure, including an undecodable body, is
/// reported as `valid: false`; the reason only goes to the log.
#[utoipa::path(
    post,
    path = "/verify",
    request_body = Vec<SignedChallenge>,
    tag = "ROLA",
    responses((status = 200, description = "Verification outcome", body = VerifyResponse))
)]
pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<Vec<SignedChallenge>>, JsonRejection>,
) -> Json<VerifyResponse> {
    let proofs = match payload {
        Ok(Json(proofs)) => proofs,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Rejected undecodable proof set");
            return Json(VerifyResponse { valid: false });
        }
    };

    match state.rola.authenticate(&proofs).await {
        Ok(verified) => {
            tracing::info!(proofs = verified.len(), "Proof set verified");
            Json(VerifyResponse { valid: true })
        }
        Err(e) => {
            tracing::warn!(
                error_code = e.error_code(),
                error = %e,
                proofs = proofs.len(),
                "Proof set rejected"
            );
            Json(VerifyResponse { valid: false })
        }
    }
}
