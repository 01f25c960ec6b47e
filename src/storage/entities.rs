// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stored row types for the embedded database.
//!
//! Rows are serialized as JSON bytes. Challenge and account rows are owned
//! exclusively by the store; the service keeps no in-memory copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A pending authentication challenge, keyed by its random token.
///
/// Created on issue, deleted on successful verify or by the sweeper,
/// never updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredChallenge {
    /// Wallet address the challenge was issued for (as supplied).
    pub wallet_address: String,
    /// Random hex token; unique while the row exists.
    pub token: String,
    /// Instant after which the challenge is unusable.
    pub expired_at: DateTime<Utc>,
}

/// An isolated customer scope, resolved by API key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredTenant {
    /// Globally unique tenant identifier (UUIDv4 string).
    pub id: String,
    /// Unique, immutable API key owned by this tenant.
    pub api_key: String,
    /// Wallet address of the tenant's administrator account, if any.
    pub admin_wallet_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A tenant-scoped account row, keyed by `(tenant_id, wallet_address)`.
///
/// Created once per tenant+wallet pair; metadata is opaque bytes and is
/// never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAccount {
    pub tenant_id: String,
    /// Wallet address as supplied at creation (checksum case preserved).
    pub wallet_address: String,
    pub created_at: DateTime<Utc>,
    /// Opaque metadata blob, typically JSON text.
    pub metadata: Vec<u8>,
}
