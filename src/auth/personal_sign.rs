// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ethereum "personal sign" (EIP-191) signer recovery.
//!
//! Wallets sign `keccak256("\x19Ethereum Signed Message:\n" + len + message)`
//! rather than the raw message, which distinguishes human-readable signing
//! requests from transaction signing. Given the 65-byte `r‖s‖v` signature we
//! recover the secp256k1 public key and derive the signer's address — the
//! public key is never needed in advance.
//!
//! The recovered address is checksum-cased; callers must compare it to the
//! expected address case-insensitively.

use alloy::primitives::{keccak256, Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};

/// Signature verification failure.
///
/// All variants are presented to API clients as a single "signature
/// invalid" condition; the distinction only matters for logs and tests.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PersonalSignError {
    #[error("signature is not valid hex")]
    InvalidHex,

    #[error("signature must be 65 bytes, got {0}")]
    InvalidLength(usize),

    #[error("public key recovery failed")]
    RecoveryFailed,
}

/// EIP-191 hash of a human-readable message.
///
/// The length tag is the decimal byte length of the message.
pub fn eip191_hash(message: &str) -> B256 {
    keccak256(format!("\x19Ethereum Signed Message:\n{}{message}", message.len()).as_bytes())
}

/// Recover the wallet address that personal-signed `message`.
///
/// `signature_hex` is the hex-encoded 65-byte `r‖s‖v` signature, with or
/// without a `0x` prefix. The legacy `v ∈ {27, 28}` encoding is normalized
/// to `{0, 1}` before recovery (EIP-155 compatibility).
pub fn recover_signer(message: &str, signature_hex: &str) -> Result<Address, PersonalSignError> {
    let bytes = alloy::hex::decode(signature_hex).map_err(|_| PersonalSignError::InvalidHex)?;
    if bytes.len() != 65 {
        return Err(PersonalSignError::InvalidLength(bytes.len()));
    }

    let mut v = bytes[64];
    if v == 27 || v == 28 {
        v -= 27;
    }
    let recovery_id = RecoveryId::from_byte(v).ok_or(PersonalSignError::RecoveryFailed)?;
    let signature =
        Signature::from_slice(&bytes[..64]).map_err(|_| PersonalSignError::RecoveryFailed)?;

    let digest = eip191_hash(message);
    let verifying_key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id)
        .map_err(|_| PersonalSignError::RecoveryFailed)?;

    Ok(Address::from_public_key(&verifying_key))
}
