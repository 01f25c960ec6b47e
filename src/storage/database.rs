// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded authentication database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `challenges`: token → serialized StoredChallenge
//! - `tenants`: tenant_id → serialized StoredTenant
//! - `tenant_api_keys`: api_key → tenant_id
//! - `accounts`: composite key (tenant_id|lowercase_wallet) → serialized
//!   StoredAccount
//!
//! Challenge consumption is a single `remove` inside one write transaction;
//! the returned previous value tells the caller whether it won the row.
//! Two concurrent consumers of the same token therefore cannot both
//! observe "exists" — redb serializes write transactions.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database as RedbDatabase, ReadableDatabase, ReadableTable, TableDefinition};

use super::entities::{StoredAccount, StoredChallenge, StoredTenant};

// =============================================================================
// Table Definitions
// =============================================================================

/// Pending challenges: token → StoredChallenge (JSON bytes).
const CHALLENGES: TableDefinition<&str, &[u8]> = TableDefinition::new("challenges");

/// Tenants: tenant_id → StoredTenant (JSON bytes).
const TENANTS: TableDefinition<&str, &[u8]> = TableDefinition::new("tenants");

/// Unique API-key index: api_key → tenant_id.
const TENANT_API_KEYS: TableDefinition<&str, &str> = TableDefinition::new("tenant_api_keys");

/// Accounts: composite key (tenant_id|lowercase_wallet) → StoredAccount (JSON bytes).
const ACCOUNTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("accounts");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Key Helpers
// =============================================================================

/// Build the composite key for the accounts table.
///
/// Format: `tenant_id | lowercase_wallet`. Lowercasing the address makes
/// the `(tenant, wallet)` uniqueness boundary case-insensitive.
fn account_key(tenant_id: &str, wallet_address: &str) -> Vec<u8> {
    let addr = wallet_address.to_lowercase();
    let mut key = Vec::with_capacity(tenant_id.len() + 1 + addr.len());
    key.extend_from_slice(tenant_id.as_bytes());
    key.push(b'|');
    key.extend_from_slice(addr.as_bytes());
    key
}

// =============================================================================
// Database
// =============================================================================

/// Embedded ACID database holding challenges, tenants, and accounts.
pub struct Database {
    db: RedbDatabase,
}

impl Database {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = RedbDatabase::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CHALLENGES)?;
            let _ = write_txn.open_table(TENANTS)?;
            let _ = write_txn.open_table(TENANT_API_KEYS)?;
            let _ = write_txn.open_table(ACCOUNTS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    // =========================================================================
    // Challenges
    // =========================================================================

    /// Insert a freshly issued challenge.
    ///
    /// No per-wallet uniqueness: a wallet may hold several live challenges
    /// at once, and the last one presented with a valid signature wins.
    pub fn insert_challenge(&self, challenge: &StoredChallenge) -> StoreResult<()> {
        let json = serde_json::to_vec(challenge)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CHALLENGES)?;
            table.insert(challenge.token.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up a challenge by token without consuming it.
    pub fn get_challenge(&self, token: &str) -> StoreResult<Option<StoredChallenge>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CHALLENGES)?;
        match table.get(token)? {
            Some(value) => {
                let challenge: StoredChallenge = serde_json::from_slice(value.value())?;
                Ok(Some(challenge))
            }
            None => Ok(None),
        }
    }

    /// Atomically consume (delete) a challenge, returning the removed row.
    ///
    /// `None` means another caller already consumed it (or it never
    /// existed). Exactly one of any number of concurrent calls for the
    /// same token receives `Some`.
    pub fn consume_challenge(&self, token: &str) -> StoreResult<Option<StoredChallenge>> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(CHALLENGES)?;
            let removed = match table.remove(token)? {
                Some(value) => Some(serde_json::from_slice(value.value())?),
                None => None,
            };
            removed
        };
        write_txn.commit()?;
        Ok(removed)
    }

    /// Bulk-delete all challenges with `expired_at <= now`.
    ///
    /// Runs as a single write transaction and returns the number of rows
    /// removed. Idempotent; verification also checks expiry inline, so a
    /// missed sweep only delays cleanup.
    pub fn delete_expired_challenges(&self, now: DateTime<Utc>) -> StoreResult<usize> {
        let write_txn = self.db.begin_write()?;
        let mut expired: Vec<String> = Vec::new();
        {
            let mut table = write_txn.open_table(CHALLENGES)?;
            for entry in table.iter()? {
                let (key, value) = entry?;
                let challenge: StoredChallenge = serde_json::from_slice(value.value())?;
                if challenge.expired_at <= now {
                    expired.push(key.value().to_string());
                }
            }
            for token in &expired {
                table.remove(token.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(expired.len())
    }

    // =========================================================================
    // Tenants
    // =========================================================================

    /// Create a tenant and index its API key.
    ///
    /// Fails with `AlreadyExists` if the API key is already taken; the key
    /// check and both inserts share one write transaction.
    pub fn create_tenant(&self, tenant: &StoredTenant) -> StoreResult<()> {
        let json = serde_json::to_vec(tenant)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut keys = write_txn.open_table(TENANT_API_KEYS)?;
            if keys.get(tenant.api_key.as_str())?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "Tenant with API key ending {}",
                    tail(&tenant.api_key)
                )));
            }
            keys.insert(tenant.api_key.as_str(), tenant.id.as_str())?;

            let mut tenants = write_txn.open_table(TENANTS)?;
            tenants.insert(tenant.id.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Resolve a tenant by exact API-key match.
    pub fn tenant_by_api_key(&self, api_key: &str) -> StoreResult<Option<StoredTenant>> {
        let read_txn = self.db.begin_read()?;
        let keys = read_txn.open_table(TENANT_API_KEYS)?;
        let tenant_id = match keys.get(api_key)? {
            Some(v) => v.value().to_string(),
            None => return Ok(None),
        };
        let tenants = read_txn.open_table(TENANTS)?;
        match tenants.get(tenant_id.as_str())? {
            Some(value) => {
                let tenant: StoredTenant = serde_json::from_slice(value.value())?;
                Ok(Some(tenant))
            }
            None => Ok(None),
        }
    }

    // =========================================================================
    // Accounts
    // =========================================================================

    /// Create an account row, enforcing `(tenant, wallet)` uniqueness.
    ///
    /// The existence check and the insert share one write transaction, so a
    /// duplicate attempt always observes the earlier row and fails with
    /// `AlreadyExists`, leaving the stored metadata unchanged.
    pub fn create_account(&self, account: &StoredAccount) -> StoreResult<()> {
        let key = account_key(&account.tenant_id, &account.wallet_address);
        let json = serde_json::to_vec(account)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ACCOUNTS)?;
            if table.get(key.as_slice())?.is_some() {
                return Err(StoreError::AlreadyExists(format!(
                    "Account {} for tenant {}",
                    account.wallet_address, account.tenant_id
                )));
            }
            table.insert(key.as_slice(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up an account by tenant and wallet address (case-insensitive).
    pub fn get_account(
        &self,
        tenant_id: &str,
        wallet_address: &str,
    ) -> StoreResult<Option<StoredAccount>> {
        let key = account_key(tenant_id, wallet_address);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ACCOUNTS)?;
        match table.get(key.as_slice())? {
            Some(value) => {
                let account: StoredAccount = serde_json::from_slice(value.value())?;
                Ok(Some(account))
            }
            None => Ok(None),
        }
    }

    /// Cheap readability probe for health checks.
    pub fn is_readable(&self) -> bool {
        self.db.begin_read().is_ok()
    }
}

/// Last few characters of a secret, safe to put in error messages.
fn tail(secret: &str) -> &str {
    secret.get(secret.len().saturating_sub(4)..).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn open_test_db() -> (Database, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let db = Database::open(&dir.path().join("test.redb")).expect("open db");
        (db, dir)
    }

    fn challenge(token: &str, minutes_from_now: i64) -> StoredChallenge {
        StoredChallenge {
            wallet_address: "0x25a3aaf7a4fF88A8aa53ff63CFE5e8C16ce93756".into(),
            token: token.into(),
            expired_at: Utc::now() + Duration::minutes(minutes_from_now),
        }
    }

    fn tenant(api_key: &str) -> StoredTenant {
        StoredTenant {
            id: uuid::Uuid::new_v4().to_string(),
            api_key: api_key.into(),
            admin_wallet_address: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn challenge_roundtrip_and_single_consume() {
        let (db, _dir) = open_test_db();
        let ch = challenge("aabbcc", 5);
        db.insert_challenge(&ch).unwrap();

        let fetched = db.get_challenge("aabbcc").unwrap().unwrap();
        assert_eq!(fetched, ch);

        let consumed = db.consume_challenge("aabbcc").unwrap().unwrap();
        assert_eq!(consumed.token, "aabbcc");

        // A second consume observes "not found"
        assert!(db.consume_challenge("aabbcc").unwrap().is_none());
        assert!(db.get_challenge("aabbcc").unwrap().is_none());
    }

    #[test]
    fn consume_unknown_token_returns_none() {
        let (db, _dir) = open_test_db();
        assert!(db.consume_challenge("missing").unwrap().is_none());
    }

    #[test]
    fn delete_expired_removes_only_past_rows() {
        let (db, _dir) = open_test_db();
        db.insert_challenge(&challenge("past1", -10)).unwrap();
        db.insert_challenge(&challenge("past2", -1)).unwrap();
        db.insert_challenge(&challenge("live", 5)).unwrap();

        let removed = db.delete_expired_challenges(Utc::now()).unwrap();
        assert_eq!(removed, 2);
        assert!(db.get_challenge("past1").unwrap().is_none());
        assert!(db.get_challenge("past2").unwrap().is_none());
        assert!(db.get_challenge("live").unwrap().is_some());

        // Idempotent
        assert_eq!(db.delete_expired_challenges(Utc::now()).unwrap(), 0);
    }

    #[test]
    fn tenant_create_and_lookup_by_api_key() {
        let (db, _dir) = open_test_db();
        let t = tenant("key-123");
        db.create_tenant(&t).unwrap();

        let found = db.tenant_by_api_key("key-123").unwrap().unwrap();
        assert_eq!(found.id, t.id);
        assert!(db.tenant_by_api_key("other").unwrap().is_none());
    }

    #[test]
    fn tenant_api_key_is_unique() {
        let (db, _dir) = open_test_db();
        db.create_tenant(&tenant("key-123")).unwrap();
        let err = db.create_tenant(&tenant("key-123")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[test]
    fn account_create_once_per_tenant_and_wallet() {
        let (db, _dir) = open_test_db();
        let account = StoredAccount {
            tenant_id: "tenant-a".into(),
            wallet_address: "0x25a3aaf7a4fF88A8aa53ff63CFE5e8C16ce93756".into(),
            created_at: Utc::now(),
            metadata: br#"{"email":"first@example.com"}"#.to_vec(),
        };
        db.create_account(&account).unwrap();

        // Duplicate with different casing still collides
        let dup = StoredAccount {
            wallet_address: account.wallet_address.to_uppercase().replace("0X", "0x"),
            metadata: br#"{"email":"second@example.com"}"#.to_vec(),
            ..account.clone()
        };
        let err = db.create_account(&dup).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(_)));

        // Metadata unchanged by the failed attempt
        let stored = db
            .get_account("tenant-a", "0x25A3AAF7A4FF88A8AA53FF63CFE5E8C16CE93756")
            .unwrap()
            .unwrap();
        assert_eq!(stored.metadata, account.metadata);
    }

    #[test]
    fn account_is_scoped_to_tenant() {
        let (db, _dir) = open_test_db();
        let account = StoredAccount {
            tenant_id: "tenant-a".into(),
            wallet_address: "0xabc".into(),
            created_at: Utc::now(),
            metadata: Vec::new(),
        };
        db.create_account(&account).unwrap();

        // Same wallet under another tenant is a distinct row
        let other = StoredAccount {
            tenant_id: "tenant-b".into(),
            ..account.clone()
        };
        db.create_account(&other).unwrap();

        assert!(db.get_account("tenant-a", "0xabc").unwrap().is_some());
        assert!(db.get_account("tenant-b", "0xabc").unwrap().is_some());
        assert!(db.get_account("tenant-c", "0xabc").unwrap().is_none());
    }
}
