// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Passwordless, challenge-response authentication for wallet holders.
//!
//! ## Auth Flow
//!
//! 1. Client obtains a challenge message for a claimed wallet address
//! 2. The wallet personal-signs the exact message (EIP-191)
//! 3. Server recovers the signer from the signature, consumes the
//!    challenge, and mints a short-lived ES256 proof credential
//! 4. Client sends `Proof-Token: <credential>` on account operations
//!
//! Every tenant-scoped route additionally requires `Api-Key: <key>`.
//!
//! ## Security
//!
//! - Challenges are single-use and expire after five minutes
//! - Proof credentials are stateless, pinned to one signature algorithm,
//!   and expire after five minutes; there is no revocation list
//! - API-key and proof failures collapse to single errors (no oracle)

pub mod api_key;
pub mod error;
pub mod extractor;
pub mod personal_sign;
pub mod proof;

pub use api_key::{generate_api_key, ApiKeyAuth, API_KEY_HEADER};
pub use error::AuthError;
pub use extractor::{ProofAuth, PROOF_TOKEN_HEADER};
pub use personal_sign::{recover_signer, PersonalSignError};
pub use proof::{ProofClaims, ProofError, ProofProvider, PROOF_VALID_MINUTES};
