// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store of outstanding challenges.
//!
//! ## Lifecycle
//!
//! 1. [`ChallengeStore::create`] issues a 32-byte random token and records its
//!    expiry (`now + ttl`).
//! 2. [`ChallengeStore::verify_and_consume`] removes the token and reports
//!    whether it was still fresh. The token is gone after the first call
//!    whatever the answer, so a challenge backs at most one authentication.
//! 3. Tokens that are never presented are dropped by
//!    [`ChallengeStore::prune_expired`] (driven by the background sweeper).
//!
//! The store is not durable: a restart forgets every outstanding challenge.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use super::error::RolaError;
use super::secure_random::{secure_random, CHALLENGE_BYTES};

/// Default challenge lifetime (5 minutes).
pub const DEFAULT_CHALLENGE_TTL: Duration = Duration::from_secs(300);

/// Longest accepted challenge lifetime (one day). Larger TTLs are clamped.
pub const MAX_CHALLENGE_TTL: Duration = Duration::from_secs(86_400);

/// Single-use challenge registry shared by all requests.
pub struct ChallengeStore {
    /// Challenge hex -> expiry instant
    challenges: Mutex<HashMap<String, Instant>>,
    ttl: Duration,
}

impl ChallengeStore {
    /// Create an empty store with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_CHALLENGE_TTL)
    }

    /// Create an empty store whose challenges live for `ttl`, at most
    /// [`MAX_CHALLENGE_TTL`].
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            challenges: Mutex::new(HashMap::new()),
            ttl: ttl.min(MAX_CHALLENGE_TTL),
        }
    }

    /// Lifetime given to newly issued challenges.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a new challenge and remember it until it expires.
    pub fn create(&self) -> Result<String, RolaError> {
        let challenge = secure_random(CHALLENGE_BYTES)?;
        let now = Instant::now();
        let expires_at = now
            .checked_add(self.ttl)
            .or_else(|| now.checked_add(MAX_CHALLENGE_TTL))
            .unwrap_or(now);
        self.lock().insert(challenge.clone(), expires_at);
        Ok(challenge)
    }

    /// Remove `challenge` from the store and report whether it was still valid.
    ///
    /// Returns `false` for unknown tokens. Known tokens are deleted before the
    /// expiry comparison, so an expired token is consumed as well and every
    /// later call for it returns `false`.
    pub fn verify_and_consume(&self, challenge: &str) -> bool {
        let now = Instant::now();
        match self.lock().remove(challenge) {
            Some(expires_at) => expires_at > now,
            None => false,
        }
    }

    /// Drop every expired challenge. Returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let mut challenges = self.lock();
        let before = challenges.len();
        challenges.retain(|_, expires_at| *expires_at > now);
        before - challenges.len()
    }

    /// Number of outstanding (not yet consumed or pruned) challenges.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every critical section is a single map operation, so a poisoned map is
    // still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.challenges.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChallengeStore {
    fn default() -> Self {
        Self::new()
    }
}
