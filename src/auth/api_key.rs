// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API-key tenant resolution.
//!
//! Every tenant-scoped route requires the `Api-Key` header; the
//! [`ApiKeyAuth`] extractor resolves it to the owning tenant by exact
//! match and binds the tenant into the handler. There is no anonymous
//! fallback, and a missing, malformed, or unknown key all produce the
//! same error so the response cannot confirm whether a key exists.

use axum::{extract::FromRequestParts, http::request::Parts};
use base64ct::{Base64Url, Encoding};
use ring::rand::{SecureRandom, SystemRandom};
use uuid::Uuid;

use super::AuthError;
use crate::state::AppState;
use crate::storage::StoredTenant;

/// Header carrying the tenant API key.
pub const API_KEY_HEADER: &str = "Api-Key";

/// Random suffix length of generated API keys, in bytes.
const API_KEY_SUFFIX_LENGTH: usize = 16;

/// Extractor binding the tenant resolved from the `Api-Key` header.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(ApiKeyAuth(tenant): ApiKeyAuth) -> impl IntoResponse {
///     // tenant is the resolved StoredTenant
/// }
/// ```
pub struct ApiKeyAuth(pub StoredTenant);

impl FromRequestParts<AppState> for ApiKeyAuth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Absent header is treated as the empty key, which matches no tenant
        let api_key = parts
            .headers
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("");

        let tenant = state
            .db
            .tenant_by_api_key(api_key)
            .map_err(|e| AuthError::InternalError(e.to_string()))?
            .ok_or(AuthError::ApiKeyInvalid)?;

        Ok(ApiKeyAuth(tenant))
    }
}

/// Generate a fresh tenant API key.
///
/// Format: compact UUIDv7 followed by URL-safe base64 of 16 random bytes,
/// lowercased. The UUID prefix keeps keys sortable by creation time; the
/// random suffix carries the guessing resistance.
pub fn generate_api_key() -> Result<String, ring::error::Unspecified> {
    let rng = SystemRandom::new();
    let mut suffix = [0u8; API_KEY_SUFFIX_LENGTH];
    rng.fill(&mut suffix)?;

    Ok(format!(
        "{}{}",
        Uuid::now_v7().simple(),
        Base64Url::encode_string(&suffix).to_lowercase()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;

    fn seeded_state() -> (AppState, tempfile::TempDir, StoredTenant) {
        let (state, dir) = AppState::for_tests();
        let tenant = StoredTenant {
            id: Uuid::new_v4().to_string(),
            api_key: generate_api_key().unwrap(),
            admin_wallet_address: None,
            created_at: Utc::now(),
        };
        state.db.create_tenant(&tenant).expect("seed tenant");
        (state, dir, tenant)
    }

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/test");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn resolves_tenant_from_api_key_header() {
        let (state, _dir, tenant) = seeded_state();
        let mut parts = parts_with_headers(&[(API_KEY_HEADER, tenant.api_key.as_str())]);

        let ApiKeyAuth(resolved) = ApiKeyAuth::from_request_parts(&mut parts, &state)
            .await
            .expect("tenant resolves");
        assert_eq!(resolved.id, tenant.id);
    }

    #[tokio::test]
    async fn missing_header_is_invalid() {
        let (state, _dir, _tenant) = seeded_state();
        let mut parts = parts_with_headers(&[]);

        let result = ApiKeyAuth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::ApiKeyInvalid)));
    }

    #[tokio::test]
    async fn unknown_key_is_invalid() {
        let (state, _dir, _tenant) = seeded_state();
        let mut parts = parts_with_headers(&[(API_KEY_HEADER, "not-a-real-key")]);

        let result = ApiKeyAuth::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::ApiKeyInvalid)));
    }

    #[test]
    fn generated_keys_are_unique_and_lowercase() {
        let a = generate_api_key().unwrap();
        let b = generate_api_key().unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.to_lowercase());
        // 32-char compact UUID prefix plus base64 suffix
        assert!(a.len() > 32);
    }
}
