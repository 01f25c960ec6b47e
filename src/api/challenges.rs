// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge lifecycle: issuance and verification.
//!
//! A challenge is a random, time-boxed, single-use token bound to a claimed
//! wallet address. The client has the wallet personal-sign the exact
//! challenge message; verification recovers the signer, consumes the
//! challenge atomically, and mints a proof credential.

use axum::{extract::State, Json};
use chrono::{Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};

use crate::{
    auth::{recover_signer, ApiKeyAuth},
    error::ApiError,
    models::{ChallengeResponse, IssueChallengeRequest, ProofTokenResponse, VerifyChallengeRequest},
    state::AppState,
    storage::StoredChallenge,
};

/// Random token length in bytes (hex-encodes to twice as many characters).
pub const CHALLENGE_TOKEN_LENGTH: usize = 16;

/// Fixed prefix of every challenge message. The client signs
/// `CHALLENGE_MESSAGE_PREFIX + token` verbatim.
pub const CHALLENGE_MESSAGE_PREFIX: &str = "Authentication request\n";

/// Challenge lifetime.
pub const CHALLENGE_VALID_MINUTES: i64 = 5;

pub const MSG_CHALLENGE_NOT_FOUND_OR_EXPIRED: &str = "Challenge does not exist or has expired";
pub const MSG_SIGNATURE_INVALID: &str = "Signature is invalid for given challenge";

/// Generate a cryptographically random hex challenge token.
fn generate_challenge_token() -> Result<String, ring::error::Unspecified> {
    let rng = SystemRandom::new();
    let mut bytes = [0u8; CHALLENGE_TOKEN_LENGTH];
    rng.fill(&mut bytes)?;
    Ok(alloy::hex::encode(bytes))
}

#[utoipa::path(
    post,
    path = "/v1/challenges/issue",
    request_body = IssueChallengeRequest,
    tag = "Challenges",
    responses(
        (status = 200, body = ChallengeResponse),
        (status = 400, description = "Invalid API key or missing wallet address")
    )
)]
pub async fn issue_challenge(
    ApiKeyAuth(_tenant): ApiKeyAuth,
    State(state): State<AppState>,
    Json(request): Json<IssueChallengeRequest>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    if request.wallet_address.is_empty() {
        return Err(ApiError::bad_request("walletAddress is required"));
    }

    let token = generate_challenge_token()
        .map_err(|_| ApiError::internal("failed to generate challenge token"))?;

    // Multiple concurrent challenges per wallet are fine; the last one
    // presented with a valid signature wins.
    state
        .db
        .insert_challenge(&StoredChallenge {
            wallet_address: request.wallet_address.into(),
            token: token.clone(),
            expired_at: Utc::now() + Duration::minutes(CHALLENGE_VALID_MINUTES),
        })
        .map_err(ApiError::internal)?;

    Ok(Json(ChallengeResponse {
        challenge: format!("{CHALLENGE_MESSAGE_PREFIX}{token}"),
    }))
}

#[utoipa::path(
    post,
    path = "/v1/challenges/verify",
    request_body = VerifyChallengeRequest,
    tag = "Challenges",
    responses(
        (status = 200, body = ProofTokenResponse),
        (status = 422, description = "Challenge not found/expired or signature invalid")
    )
)]
pub async fn verify_challenge(
    ApiKeyAuth(_tenant): ApiKeyAuth,
    State(state): State<AppState>,
    Json(request): Json<VerifyChallengeRequest>,
) -> Result<Json<ProofTokenResponse>, ApiError> {
    // Extract challenge token and get the associated wallet address
    let token = request
        .challenge
        .strip_prefix(CHALLENGE_MESSAGE_PREFIX)
        .unwrap_or(&request.challenge);

    let challenge = state
        .db
        .get_challenge(token)
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::unprocessable(MSG_CHALLENGE_NOT_FOUND_OR_EXPIRED))?;

    // Inline expiry check: closes the window between expiry and the next
    // sweeper run. Expired rows are left for the sweeper.
    if challenge.expired_at <= Utc::now() {
        return Err(ApiError::unprocessable(MSG_CHALLENGE_NOT_FOUND_OR_EXPIRED));
    }

    // Recover the signer over the original, prefixed message
    let signer = recover_signer(&request.challenge, &request.signature)
        .map_err(|_| ApiError::unprocessable(MSG_SIGNATURE_INVALID))?;
    if !challenge.wallet_address.eq_ignore_ascii_case(&signer.to_string()) {
        return Err(ApiError::unprocessable(MSG_SIGNATURE_INVALID));
    }

    // Atomic consume: of any concurrent verifiers of this token, exactly
    // one gets the row back; the rest observe "not found".
    let consumed = state
        .db
        .consume_challenge(token)
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::unprocessable(MSG_CHALLENGE_NOT_FOUND_OR_EXPIRED))?;

    let proof_token = state
        .proof
        .issue(&consumed.wallet_address)
        .map_err(ApiError::internal)?;

    Ok(Json(ProofTokenResponse { proof_token }))
}
