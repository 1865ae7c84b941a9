// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Challenge Sweeper
//!
//! Background task that drops expired challenges from the in-memory store.
//! Challenges that are never presented would otherwise stay in memory until
//! restart; correctness does not depend on the sweeper, since
//! `verify_and_consume` rejects expired tokens on its own.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken` for graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::DEFAULT_SWEEP_INTERVAL;
use crate::rola::ChallengeStore;

pub struct ChallengeSweeper {
    store: Arc<ChallengeStore>,
    interval: Duration,
}

impl ChallengeSweeper {
    pub fn new(store: Arc<ChallengeStore>) -> Self {
        Self {
            store,
            interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
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
            interval_secs = self.interval.as_secs(),
            "Challenge sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Challenge sweeper shutting down");
                    return;
                }
            }

            self.sweep_step();
        }
    }

    /// Execute one sweep. Returns the number of challenges removed.
    fn sweep_step(&self) -> usize {
        let removed = self.store.prune_expired();
        if removed > 0 {
            debug!(
                removed,
                outstanding = self.store.len(),
                "Swept expired challenges"
            );
        }
        removed
    }
}
