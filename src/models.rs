// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `Serialize`, `Deserialize`, and `ToSchema`
//! for automatic JSON handling and OpenAPI documentation.
//!
//! Wire field names are camelCase (`walletAddress`, `proofToken`, ...).
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Ethereum-style addresses (0x-prefixed,
//! 40 hex characters). Addresses are checksum-cased for display but
//! semantically case-insensitive, so all comparisons go through
//! [`WalletAddress::matches`] and all storage keys through
//! [`WalletAddress::storage_key`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address wrapper.
///
/// Provides type safety for wallet addresses throughout the API.
/// Format: `0x` followed by 40 hexadecimal characters (20 bytes).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    /// Case-insensitive equality with another address string.
    ///
    /// Checksum casing differs between wallets; two addresses are the same
    /// account whenever their hex digits match.
    pub fn matches(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other)
    }

    /// Canonical lowercase form used as the storage key component.
    pub fn storage_key(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Challenge Models
// =============================================================================

/// Request body for challenge issuance.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssueChallengeRequest {
    /// The wallet address claiming to authenticate.
    pub wallet_address: WalletAddress,
}

/// Response carrying the literal message the wallet must sign.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    /// Fixed prefix plus the random hex token.
    pub challenge: String,
}

/// Request body for challenge verification.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyChallengeRequest {
    /// The exact challenge message previously returned by issue.
    pub challenge: String,
    /// Hex-encoded 65-byte EIP-191 signature over the challenge message.
    pub signature: String,
}

/// Response carrying the freshly minted proof credential.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProofTokenResponse {
    pub proof_token: String,
}

// =============================================================================
// Account Models
// =============================================================================

/// Request body for account provisioning.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    /// Wallet address to provision; must match the proof-token subject.
    pub wallet_address: WalletAddress,
    /// Optional opaque metadata. Non-empty values must be well-formed JSON
    /// text; the server stores the bytes as-is.
    #[serde(default)]
    pub metadata: Option<String>,
}

/// Response wrapping the stored account metadata.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetadataResponse {
    /// The stored metadata decoded as JSON, or `null` when none was stored.
    #[schema(value_type = Object)]
    pub metadata: serde_json::Value,
}
