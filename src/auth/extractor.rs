// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for proof-credential authentication.
//!
//! Use the `ProofAuth` extractor in handlers that require a proven wallet:
//!
//! ```rust,ignore
//! async fn my_handler(ProofAuth(claims): ProofAuth) -> impl IntoResponse {
//!     // claims.sub is the proven wallet address
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthError, ProofClaims};
use crate::state::AppState;

/// Header carrying the proof credential (never a cookie).
pub const PROOF_TOKEN_HEADER: &str = "Proof-Token";

/// Extractor for requests carrying a valid proof credential.
///
/// Validation is stateless: signature, pinned algorithm, expiry, and
/// subject shape are re-checked on every request against the process-wide
/// public key.
pub struct ProofAuth(pub ProofClaims);

impl FromRequestParts<AppState> for ProofAuth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(PROOF_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let claims = state
            .proof
            .validate(token)
            .map_err(|_| AuthError::ProofTokenInvalid)?;

        Ok(ProofAuth(claims))
    }
}
