// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{env, net::SocketAddr, path::Path, time::Duration};

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use walletgate::api::router;
use walletgate::auth::ProofProvider;
use walletgate::config::{
    DATA_DIR_ENV, DEFAULT_DATA_DIR, HOST_ENV, LOG_FORMAT_ENV, PORT_ENV, PROOF_PRIVATE_KEY_ENV,
    PROOF_PUBLIC_KEY_ENV, SEED_API_KEY_ENV, SWEEP_INTERVAL_ENV, TLS_CERT_ENV, TLS_KEY_ENV,
};
use walletgate::state::AppState;
use walletgate::storage::{Database, StoreError, StoredTenant};
use walletgate::sweeper::ChallengeSweeper;

#[tokio::main]
async fn main() {
    init_tracing();

    // The proof key pair is mandatory; the service cannot mint or validate
    // credentials without it.
    let private_pem = read_key_file(PROOF_PRIVATE_KEY_ENV);
    let public_pem = read_key_file(PROOF_PUBLIC_KEY_ENV);
    let proof =
        ProofProvider::from_pem(&private_pem, &public_pem).expect("Failed to parse proof key pair");

    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    let db = Database::open(&Path::new(&data_dir).join("walletgate.redb"))
        .expect("Failed to open database");

    if let Ok(api_key) = env::var(SEED_API_KEY_ENV) {
        seed_tenant(&db, api_key);
    }

    let state = AppState::new(db, proof);
    let app = router(state.clone());

    // Background expired-challenge sweeper
    let shutdown = CancellationToken::new();
    let mut sweeper = ChallengeSweeper::new(state.db.clone());
    if let Some(interval) = env::var(SWEEP_INTERVAL_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
    {
        sweeper = sweeper.with_interval(interval);
    }
    tokio::spawn(sweeper.run(shutdown.clone()));

    // Graceful shutdown on ctrl-c
    let handle = Handle::new();
    {
        let handle = handle.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for shutdown signal");
            info!("Shutdown signal received");
            shutdown.cancel();
            handle.graceful_shutdown(Some(Duration::from_secs(10)));
        });
    }

    // Parse bind address
    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    match (env::var(TLS_CERT_ENV), env::var(TLS_KEY_ENV)) {
        (Ok(cert_path), Ok(key_path)) => {
            // Install the ring crypto provider for rustls (must be done
            // before any TLS operations)
            rustls::crypto::ring::default_provider()
                .install_default()
                .expect("Failed to install rustls crypto provider");

            let tls_config = RustlsConfig::from_pem_file(cert_path, key_path)
                .await
                .expect("Failed to load TLS credentials");

            info!(%addr, "Walletgate listening with TLS (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTPS server failed");
        }
        _ => {
            info!(%addr, "Walletgate listening (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
                .expect("HTTP server failed");
        }
    }
}

/// Create a tenant owning the seed API key, once.
fn seed_tenant(db: &Database, api_key: String) {
    let tenant = StoredTenant {
        id: uuid::Uuid::new_v4().to_string(),
        api_key,
        admin_wallet_address: None,
        created_at: chrono::Utc::now(),
    };
    match db.create_tenant(&tenant) {
        Ok(()) => info!(tenant_id = %tenant.id, "Seeded tenant from environment"),
        Err(StoreError::AlreadyExists(_)) => info!("Seed API key already provisioned"),
        Err(e) => panic!("Failed to seed tenant: {e}"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if env::var(LOG_FORMAT_ENV).as_deref() == Ok("json") {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_key_file(env_name: &str) -> Vec<u8> {
    let path = env::var(env_name)
        .unwrap_or_else(|_| panic!("{env_name} must be set to a PEM file path"));
    std::fs::read(&path).unwrap_or_else(|e| panic!("Failed to read {path}: {e}"))
}
