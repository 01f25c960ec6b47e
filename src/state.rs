// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::ProofProvider;
use crate::storage::Database;

/// Shared application state.
///
/// Both members are read-only after startup: the database synchronizes
/// internally and the proof key pair is immutable.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub proof: Arc<ProofProvider>,
}

impl AppState {
    pub fn new(db: Database, proof: ProofProvider) -> Self {
        Self {
            db: Arc::new(db),
            proof: Arc::new(proof),
        }
    }
}

#[cfg(test)]
impl AppState {
    /// Fresh state over a temporary database and a throwaway key pair.
    ///
    /// The returned `TempDir` must outlive the state.
    pub fn for_tests() -> (Self, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let db = Database::open(&dir.path().join("walletgate.redb")).expect("open test db");
        (Self::new(db, ProofProvider::ephemeral()), dir)
    }
}
