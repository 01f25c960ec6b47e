// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Authentication error type.
///
/// Malformed, missing, and unknown credentials collapse into single
/// variants so responses cannot be used as an existence oracle.
#[derive(Debug)]
pub enum AuthError {
    /// API key missing, malformed, or not owned by any tenant
    ApiKeyInvalid,
    /// Proof token missing, malformed, badly signed, or expired
    ProofTokenInvalid,
    /// Internal error (store or crypto library failure)
    InternalError(String),
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
    error_code: String,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::ApiKeyInvalid => "api_key_invalid",
            AuthError::ProofTokenInvalid => "proof_token_invalid_or_expired",
            AuthError::InternalError(_) => "internal_error",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::ApiKeyInvalid | AuthError::ProofTokenInvalid => StatusCode::BAD_REQUEST,
            AuthError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::ApiKeyInvalid => write!(f, "Api key is invalid"),
            AuthError::ProofTokenInvalid => {
                write!(f, "Proof token is invalid or has expired")
            }
            AuthError::InternalError(msg) => write!(f, "Internal authentication error: {msg}"),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Never leak store/crypto internals to the caller
            AuthError::InternalError(detail) => {
                tracing::error!(error = %detail, "internal auth error");
                "Internal server error".to_string()
            }
            _ => self.to_string(),
        };
        let body = Json(AuthErrorBody {
            error: message,
            error_code: self.error_code().to_string(),
        });
        (status, body).into_response()
    }
}
