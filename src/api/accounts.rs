// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tenant-scoped account provisioning.
//!
//! An account binds a proven wallet address to a tenant, with an opaque
//! metadata blob. Creation is strictly create-once: a repeat create for
//! the same `(tenant, wallet)` pair fails and leaves the stored metadata
//! untouched. Both operations require the caller to present a proof
//! credential whose subject is the wallet being operated on.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use crate::{
    auth::{ApiKeyAuth, ProofAuth},
    error::ApiError,
    models::{CreateAccountRequest, MetadataResponse, WalletAddress},
    state::AppState,
    storage::{StoreError, StoredAccount},
};

pub const MSG_ACCOUNT_ALREADY_EXISTS: &str = "Account already exists";
pub const MSG_ACCOUNT_NOT_FOUND: &str = "Account not found";
pub const MSG_WALLET_MISMATCH: &str = "Wallet address does not match proof token subject";
pub const MSG_METADATA_INVALID: &str = "Metadata is not well-formed JSON";

/// Validate non-empty metadata as well-formed JSON and return the bytes to
/// store. The blob is stored as-is; only its shape is checked, once, here
/// at the edge.
fn metadata_bytes(metadata: Option<String>) -> Result<Vec<u8>, ApiError> {
    match metadata {
        Some(text) if !text.trim().is_empty() => {
            serde_json::from_str::<serde_json::Value>(&text)
                .map_err(|_| ApiError::bad_request(MSG_METADATA_INVALID))?;
            Ok(text.into_bytes())
        }
        _ => Ok(Vec::new()),
    }
}

#[utoipa::path(
    post,
    path = "/v1/accounts",
    request_body = CreateAccountRequest,
    tag = "Accounts",
    responses(
        (status = 204, description = "Account created"),
        (status = 400, description = "Wallet mismatch, invalid metadata, or duplicate account")
    )
)]
pub async fn create_account(
    ApiKeyAuth(tenant): ApiKeyAuth,
    ProofAuth(claims): ProofAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<StatusCode, ApiError> {
    if request.wallet_address.is_empty() {
        return Err(ApiError::bad_request("walletAddress is required"));
    }
    // A caller may only provision the wallet it proved ownership of
    if !request.wallet_address.matches(&claims.sub) {
        return Err(ApiError::bad_request(MSG_WALLET_MISMATCH));
    }

    let metadata = metadata_bytes(request.metadata)?;

    state
        .db
        .create_account(&StoredAccount {
            tenant_id: tenant.id,
            wallet_address: request.wallet_address.into(),
            created_at: Utc::now(),
            metadata,
        })
        .map_err(|e| match e {
            StoreError::AlreadyExists(_) => ApiError::bad_request(MSG_ACCOUNT_ALREADY_EXISTS),
            other => ApiError::internal(other),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/v1/accounts/{wallet_address}/metadata",
    params(("wallet_address" = String, Path, description = "Wallet address of the account")),
    tag = "Accounts",
    responses(
        (status = 200, body = MetadataResponse),
        (status = 404, description = "No account for this tenant and wallet")
    )
)]
pub async fn account_metadata(
    ApiKeyAuth(tenant): ApiKeyAuth,
    ProofAuth(claims): ProofAuth,
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> Result<Json<MetadataResponse>, ApiError> {
    let wallet = WalletAddress::from(wallet_address);
    if !wallet.matches(&claims.sub) {
        return Err(ApiError::bad_request(MSG_WALLET_MISMATCH));
    }

    let account = state
        .db
        .get_account(&tenant.id, wallet.as_str())
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::not_found(MSG_ACCOUNT_NOT_FOUND))?;

    let metadata = if account.metadata.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&account.metadata).map_err(ApiError::internal)?
    };

    Ok(Json(MetadataResponse { metadata }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{generate_api_key, ProofClaims};
    use crate::storage::StoredTenant;
    use chrono::Duration;

    const WALLET: &str = "0x25a3aaf7a4fF88A8aa53ff63CFE5e8C16ce93756";

    fn tenant_auth() -> (ApiKeyAuth, String) {
        let tenant = StoredTenant {
            id: uuid::Uuid::new_v4().to_string(),
            api_key: generate_api_key().unwrap(),
            admin_wallet_address: None,
            created_at: Utc::now(),
        };
        let id = tenant.id.clone();
        (ApiKeyAuth(tenant), id)
    }

    fn proof_auth(subject: &str) -> ProofAuth {
        ProofAuth(ProofClaims {
            sub: subject.to_string(),
            exp: (Utc::now() + Duration::minutes(5)).timestamp(),
        })
    }

    async fn create(
        state: &AppState,
        tenant: ApiKeyAuth,
        subject: &str,
        wallet: &str,
        metadata: Option<&str>,
    ) -> Result<StatusCode, ApiError> {
        create_account(
            tenant,
            proof_auth(subject),
            State(state.clone()),
            Json(CreateAccountRequest {
                wallet_address: wallet.into(),
                metadata: metadata.map(str::to_string),
            }),
        )
        .await
    }

    #[tokio::test]
    async fn create_then_fetch_metadata() {
        let (state, _dir) = AppState::for_tests();
        let (auth, tenant_id) = tenant_auth();
        let metadata = r#"{"email":"client@example.com"}"#;

        let status = create(&state, auth, WALLET, WALLET, Some(metadata))
            .await
            .expect("account created");
        assert_eq!(status, StatusCode::NO_CONTENT);

        let stored = state.db.get_account(&tenant_id, WALLET).unwrap().unwrap();
        assert_eq!(stored.metadata, metadata.as_bytes());
    }

    #[tokio::test]
    async fn duplicate_create_fails_and_keeps_metadata() {
        let (state, _dir) = AppState::for_tests();
        let (auth, tenant_id) = tenant_auth();
        let first = r#"{"email":"first@example.com"}"#;

        create(&state, ApiKeyAuth(auth.0.clone()), WALLET, WALLET, Some(first))
            .await
            .expect("first create succeeds");

        // Second attempt, different casing and different metadata
        let err = create(
            &state,
            auth,
            WALLET,
            &WALLET.to_lowercase(),
            Some(r#"{"email":"second@example.com"}"#),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, MSG_ACCOUNT_ALREADY_EXISTS);

        let stored = state.db.get_account(&tenant_id, WALLET).unwrap().unwrap();
        assert_eq!(stored.metadata, first.as_bytes());
    }

    #[tokio::test]
    async fn create_rejects_wallet_not_matching_proof_subject() {
        let (state, _dir) = AppState::for_tests();
        let (auth, _) = tenant_auth();

        let err = create(
            &state,
            auth,
            WALLET,
            "0x0000000000000000000000000000000000000001",
            None,
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, MSG_WALLET_MISMATCH);
    }

    #[tokio::test]
    async fn create_rejects_malformed_metadata() {
        let (state, _dir) = AppState::for_tests();
        let (auth, _) = tenant_auth();

        let err = create(&state, auth, WALLET, WALLET, Some("{not json"))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, MSG_METADATA_INVALID);
    }

    #[tokio::test]
    async fn metadata_roundtrips_through_the_fetch_endpoint() {
        let (state, _dir) = AppState::for_tests();
        let (auth, _) = tenant_auth();
        let tenant = auth.0.clone();
        let metadata = r#"{"email":"client@example.com","plan":"pro"}"#;

        create(&state, auth, WALLET, WALLET, Some(metadata))
            .await
            .expect("account created");

        // Path may use any casing; the proof subject is checksum-cased
        let Json(response) = account_metadata(
            ApiKeyAuth(tenant),
            proof_auth(WALLET),
            State(state.clone()),
            Path(WALLET.to_lowercase()),
        )
        .await
        .expect("metadata fetched");

        assert_eq!(
            response.metadata,
            serde_json::json!({"email": "client@example.com", "plan": "pro"})
        );
    }

    #[tokio::test]
    async fn fetch_returns_null_when_no_metadata_was_stored() {
        let (state, _dir) = AppState::for_tests();
        let (auth, _) = tenant_auth();
        let tenant = auth.0.clone();

        create(&state, auth, WALLET, WALLET, None)
            .await
            .expect("account created");

        let Json(response) = account_metadata(
            ApiKeyAuth(tenant),
            proof_auth(WALLET),
            State(state.clone()),
            Path(WALLET.to_string()),
        )
        .await
        .expect("metadata fetched");
        assert_eq!(response.metadata, serde_json::Value::Null);
    }

    #[tokio::test]
    async fn fetch_unknown_account_is_404() {
        let (state, _dir) = AppState::for_tests();
        let (auth, _) = tenant_auth();

        let err = account_metadata(
            auth,
            proof_auth(WALLET),
            State(state.clone()),
            Path(WALLET.to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, MSG_ACCOUNT_NOT_FOUND);
    }

    #[tokio::test]
    async fn fetch_rejects_path_not_matching_proof_subject() {
        let (state, _dir) = AppState::for_tests();
        let (auth, _) = tenant_auth();

        let err = account_metadata(
            auth,
            proof_auth(WALLET),
            State(state.clone()),
            Path("0x0000000000000000000000000000000000000001".to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.message, MSG_WALLET_MISMATCH);
    }

    #[tokio::test]
    async fn accounts_are_isolated_between_tenants() {
        let (state, _dir) = AppState::for_tests();
        let (auth_a, _) = tenant_auth();
        let (auth_b, _) = tenant_auth();

        create(&state, auth_a, WALLET, WALLET, None)
            .await
            .expect("account created under tenant A");

        // Tenant B sees no account for the same wallet
        let err = account_metadata(
            auth_b,
            proof_auth(WALLET),
            State(state.clone()),
            Path(WALLET.to_string()),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
