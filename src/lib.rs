// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Walletgate - Wallet Challenge-Response Authentication Service
//!
//! This crate provides passwordless, multi-tenant authentication for
//! blockchain-wallet holders: challenge issuance, EIP-191 signature
//! verification with signer recovery, short-lived proof credentials, and
//! tenant-scoped account provisioning.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - API-key gate, proof credentials, signer recovery
//! - `storage` - Embedded database (redb)
//! - `sweeper` - Expired-challenge cleanup task

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod sweeper;
