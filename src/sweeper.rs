// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Expired Challenge Sweeper
//!
//! Background task that periodically bulk-deletes challenge rows past their
//! expiry. Verification checks expiry inline as well, so the sweep is pure
//! hygiene: it keeps the challenges table from accumulating dead rows.
//!
//! ## Strategy
//!
//! Every `sweep_interval` (default 30 min) the sweeper runs one bulk
//! delete of rows with `expired_at <= now`. The operation is idempotent.
//! Failures are logged and not retried — the next scheduled sweep is the
//! retry.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::storage::Database;

/// Default interval between sweeps.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Background task deleting expired challenges.
pub struct ChallengeSweeper {
    db: Arc<Database>,
    sweep_interval: Duration,
}

impl ChallengeSweeper {
    /// Create a new sweeper over the given database.
    pub fn new(db: Arc<Database>) -> Self {
        Self {
            db,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    /// Override the sweep interval.
    pub fn with_interval(mut self, sweep_interval: Duration) -> Self {
        self.sweep_interval = sweep_interval;
        self
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.sweep_interval.as_secs(),
            "Challenge sweeper starting"
        );

        loop {
            if shutdown.is_cancelled() {
                info!("Challenge sweeper shutting down");
                return;
            }

            self.sweep_step();

            tokio::select! {
                _ = tokio::time::sleep(self.sweep_interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Challenge sweeper shutting down");
                    return;
                }
            }
        }
    }

    /// Execute one sweep: bulk-delete every challenge past expiry.
    fn sweep_step(&self) {
        match self.db.delete_expired_challenges(Utc::now()) {
            Ok(0) => {}
            Ok(removed) => info!(removed, "Deleted expired challenges"),
            Err(e) => warn!(error = %e, "Challenge sweep failed, next run will retry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoredChallenge;
    use chrono::Duration as ChronoDuration;
    use tempfile::TempDir;

    fn open_test_db() -> (Arc<Database>, TempDir) {
        let dir = TempDir::new().expect("temp dir");
        let db = Database::open(&dir.path().join("test.redb")).expect("open db");
        (Arc::new(db), dir)
    }

    #[test]
    fn sweep_step_deletes_only_expired_rows() {
        let (db, _dir) = open_test_db();
        for (token, minutes) in [("stale", -30), ("fresh", 5)] {
            db.insert_challenge(&StoredChallenge {
                wallet_address: "0xabc".into(),
                token: token.into(),
                expired_at: Utc::now() + ChronoDuration::minutes(minutes),
            })
            .unwrap();
        }

        ChallengeSweeper::new(db.clone()).sweep_step();

        assert!(db.get_challenge("stale").unwrap().is_none());
        assert!(db.get_challenge("fresh").unwrap().is_some());
    }

    #[tokio::test]
    async fn run_exits_on_cancellation() {
        let (db, _dir) = open_test_db();
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(
            ChallengeSweeper::new(db)
                .with_interval(Duration::from_secs(3600))
                .run(shutdown.clone()),
        );

        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("sweeper stops promptly")
            .expect("sweeper task completes");
    }
}
