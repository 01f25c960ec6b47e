// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the embedded database | `/data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `PROOF_PRIVATE_KEY_PATH` | PKCS#8 PEM file with the ES256 signing key | Required |
//! | `PROOF_PUBLIC_KEY_PATH` | SPKI PEM file with the ES256 verifying key | Required |
//! | `SEED_API_KEY` | If set, a tenant with this API key is created at startup | Unset |
//! | `SWEEP_INTERVAL_SECS` | Seconds between expired-challenge sweeps | `1800` |
//! | `TLS_CERT_PATH` | PEM certificate chain; enables HTTPS together with `TLS_KEY_PATH` | Unset |
//! | `TLS_KEY_PATH` | PEM private key for TLS | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the database directory path.
///
/// The embedded redb database file (`walletgate.redb`) is created inside
/// this directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default database directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the ES256 private key PEM path (PKCS#8).
pub const PROOF_PRIVATE_KEY_ENV: &str = "PROOF_PRIVATE_KEY_PATH";

/// Environment variable name for the ES256 public key PEM path (SPKI).
pub const PROOF_PUBLIC_KEY_ENV: &str = "PROOF_PUBLIC_KEY_PATH";

/// Environment variable name for the startup tenant seed.
///
/// When set, a tenant row owning this exact API key is created on boot if
/// it does not exist yet. Intended for first-run provisioning.
pub const SEED_API_KEY_ENV: &str = "SEED_API_KEY";

/// Environment variable name for the sweep interval override (seconds).
pub const SWEEP_INTERVAL_ENV: &str = "SWEEP_INTERVAL_SECS";

/// Environment variable name for the TLS certificate chain path.
pub const TLS_CERT_ENV: &str = "TLS_CERT_PATH";

/// Environment variable name for the TLS private key path.
pub const TLS_KEY_ENV: &str = "TLS_KEY_PATH";

/// Environment variable name for the log format selector.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
