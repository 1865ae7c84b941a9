// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ROLA error taxonomy.
//!
//! Every failure on the verification path is one of these variants. The HTTP
//! layer collapses all of them into `{"valid": false}`; the variant and its
//! [`RolaError::error_code`] only ever reach logs and tests.

use thiserror::Error;

/// Errors produced while issuing challenges or authenticating a proof set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RolaError {
    /// The operating system random source failed. Fatal to issuance.
    #[error("Secure random source unavailable: {0}")]
    EntropySourceUnavailable(String),
    /// A referenced challenge was unknown, already used, or expired.
    #[error("Challenge is invalid or has expired")]
    ChallengeInvalidOrExpired,
    /// The proof names a curve outside the supported set.
    #[error("Unsupported curve: {0}")]
    UnsupportedCurve(String),
    /// The public key could not be decoded as a point on the claimed curve.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
    /// The signature is malformed or does not verify.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),
    /// The signing message could not be built or hashed.
    #[error("Could not hash signature message: {0}")]
    MessageHashingFailed(String),
    /// The signing key is not among the owner keys registered for the entity.
    #[error("Public key is not authorized for {0}")]
    KeyNotAuthorized(String),
    /// The caller submitted no proofs at all.
    #[error("Proof set is empty")]
    EmptyProofSet,
}

impl RolaError {
    /// Stable identifier for structured logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RolaError::EntropySourceUnavailable(_) => "entropy_source_unavailable",
            RolaError::ChallengeInvalidOrExpired => "challenge_invalid_or_expired",
            RolaError::UnsupportedCurve(_) => "unsupported_curve",
            RolaError::InvalidPublicKey(_) => "invalid_public_key",
            RolaError::InvalidSignature(_) => "invalid_signature",
            RolaError::MessageHashingFailed(_) => "message_hashing_failed",
            RolaError::KeyNotAuthorized(_) => "key_not_authorized",
            RolaError::EmptyProofSet => "empty_proof_set",
        }
    }

    /// Whether the error is fatal to the server rather than to one attempt.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RolaError::EntropySourceUnavailable(_))
    }
}
