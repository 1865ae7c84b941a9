// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{ChallengeResponse, VerifyResponse},
    rola::{Proof, ProofKind, SignedChallenge},
    state::AppState,
};

pub mod challenge;
pub mod health;
pub mod verify;

pub fn router(state: AppState) -> Router {
    let rola_routes = Router::new()
        .route("/create-challenge", get(challenge::create_challenge))
        .route("/verify", post(verify::verify))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(rola_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        challenge::create_challenge,
        verify::verify,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            ChallengeResponse,
            VerifyResponse,
            SignedChallenge,
            Proof,
            ProofKind,
            health::HealthResponse,
            health::ReadyResponse,
            health::HealthChecks
        )
    ),
    tags(
        (name = "ROLA", description = "Challenge issuance and signed-challenge verification"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::models::{ChallengeResponse, VerifyResponse};
    use crate::rola::testing::{ed25519_key, sign_ed25519};

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_verify(body: impl Into<Body>) -> Request<Body> {
        Request::post("/verify")
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.into())
            .unwrap()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::default());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn challenge_then_verify_over_http() {
        let app = router(AppState::default());

        let response = app
            .clone()
            .oneshot(Request::get("/create-challenge").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let ChallengeResponse { challenge } = body_json(response).await;

        let signed = sign_ed25519(&ed25519_key(1), &challenge);
        let body = serde_json::to_vec(&[signed]).unwrap();

        let response = app.clone().oneshot(post_verify(body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json::<VerifyResponse>(response).await, VerifyResponse { valid: true });

        let response = app.oneshot(post_verify(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json::<VerifyResponse>(response).await, VerifyResponse { valid: false });
    }

    #[tokio::test]
    async fn malformed_body_is_invalid_not_an_error_status() {
        let app = router(AppState::default());

        for body in ["not json", r#"{"challenge": "ab"}"#, r#"[{"challenge": 1}]"#] {
            let response = app.clone().oneshot(post_verify(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_json::<VerifyResponse>(response).await, VerifyResponse { valid: false });
        }
    }

    #[tokio::test]
    async fn health_endpoints_respond() {
        let app = router(AppState::default());
        for path in ["/health/live", "/health/ready"] {
            let response = app
                .clone()
                .oneshot(Request::get(path).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let app = router(AppState::default());
        let response = app
            .oneshot(Request::get("/api-doc/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let doc: serde_json::Value = body_json(response).await;
        assert!(doc["paths"]["/verify"].is_object());
        assert!(doc["paths"]["/create-challenge"].is_object());
    }
}
