// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Response bodies of the ROLA endpoints. The `/verify` request body is a
//! JSON array of [`SignedChallenge`](crate::rola::SignedChallenge).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Freshly issued challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ChallengeResponse {
    /// 32 random bytes, hex-encoded (64 characters). Single use, expires after the configured TTL.
    pub challenge: String,
}

/// Outcome of a proof-set verification.
///
/// Deliberately carries no failure reason.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct VerifyResponse {
    pub valid: bool,
}
