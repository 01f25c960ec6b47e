// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Persistent Storage Module
//!
//! Challenges, tenants, and accounts live in an embedded redb database —
//! a pure-Rust, ACID, single-file store. The service never caches rows in
//! memory; every operation is a fresh transaction.
//!
//! ## Important Notes
//!
//! - Write transactions are serialized by redb; the atomic
//!   consume-and-check used for challenge verification relies on this.
//! - Rows are serialized as JSON bytes, matching the value encoding used
//!   elsewhere in the stack.

pub mod database;
pub mod entities;

pub use database::{Database, StoreError, StoreResult};
pub use entities::{StoredAccount, StoredChallenge, StoredTenant};
