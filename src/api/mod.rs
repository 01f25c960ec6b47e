// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        ChallengeResponse, CreateAccountRequest, IssueChallengeRequest, MetadataResponse,
        ProofTokenResponse, VerifyChallengeRequest, WalletAddress,
    },
    state::AppState,
};

pub mod accounts;
pub mod challenges;
pub mod health;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/challenges/issue", post(challenges::issue_challenge))
        .route("/challenges/verify", post(challenges::verify_challenge))
        .route("/accounts", post(accounts::create_account))
        .route(
            "/accounts/{wallet_address}/metadata",
            get(accounts::account_metadata),
        )
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        challenges::issue_challenge,
        challenges::verify_challenge,
        accounts::create_account,
        accounts::account_metadata,
        health::health,
        health::liveness
    ),
    components(
        schemas(
            WalletAddress,
            IssueChallengeRequest,
            ChallengeResponse,
            VerifyChallengeRequest,
            ProofTokenResponse,
            CreateAccountRequest,
            MetadataResponse
        )
    ),
    tags(
        (name = "Challenges", description = "Challenge issuance and verification"),
        (name = "Accounts", description = "Tenant-scoped account provisioning"),
        (name = "Health", description = "Service health probes")
    )
)]
struct ApiDoc;
