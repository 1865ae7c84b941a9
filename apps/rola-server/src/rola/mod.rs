// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # ROLA (Radix Off-Ledger Authentication)
//!
//! Challenge-response authentication of wallet-held keys.
//!
//! ## Auth Flow
//!
//! 1. dApp requests a challenge (`GET /create-challenge`)
//! 2. Wallet signs `BLAKE2b-256('R' ‖ challenge ‖ len(dApp address) ‖ dApp address ‖ origin)`
//! 3. dApp posts the signed challenges (`POST /verify`)
//! 4. Server:
//!    - consumes each distinct challenge (single use, 5 minute TTL)
//!    - rebuilds the signing message with its own dApp address and origin
//!    - verifies each signature (Ed25519 or secp256k1)
//!    - optionally checks the key against the entity's on-ledger owner keys
//!
//! ## Security
//!
//! - Origin is deployment configuration, never read from the request
//! - A presented challenge is burned even if verification later fails
//! - Failure reasons are only logged; callers see `valid: false`

pub mod authenticator;
pub mod challenge_store;
pub mod error;
pub mod gateway;
pub mod secure_random;
pub mod signature_message;
pub mod types;
pub mod verify_proof;

#[cfg(test)]
pub(crate) mod testing;

pub use authenticator::{public_key_hash, Rola};
pub use challenge_store::{ChallengeStore, DEFAULT_CHALLENGE_TTL, MAX_CHALLENGE_TTL};
pub use error::RolaError;
pub use gateway::{GatewayError, GatewayService, OwnerKeyLookup};
pub use signature_message::create_signature_message;
pub use types::{Proof, ProofKind, SignedChallenge, VerifiedProof};
pub use verify_proof::{verify_proof, Curve};
