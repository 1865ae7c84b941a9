// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signature verification over the supported curve families.
//!
//! | Curve        | Scheme  | Public key                 | Signature                    |
//! |--------------|---------|----------------------------|------------------------------|
//! | `curve25519` | Ed25519 | 32 bytes                   | 64 bytes                     |
//! | `secp256k1`  | ECDSA   | 33 or 65 bytes (SEC1)      | 64 `r‖s`, 65 `v‖r‖s` or DER  |
//!
//! Both schemes sign the 32-byte BLAKE2b-256 message hash. All inputs arrive
//! hex-encoded from the wallet.

use std::fmt;
use std::str::FromStr;

use k256::ecdsa::signature::hazmat::PrehashVerifier;
use serde::{Deserialize, Serialize};

use super::error::RolaError;

/// Curve families accepted in a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Curve {
    #[serde(rename = "curve25519")]
    Curve25519,
    #[serde(rename = "secp256k1")]
    Secp256k1,
}

impl Curve {
    /// Wire identifier used by wallets.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Curve::Curve25519 => "curve25519",
            Curve::Secp256k1 => "secp256k1",
        }
    }
}

impl fmt::Display for Curve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Curve {
    type Err = RolaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "curve25519" => Ok(Curve::Curve25519),
            "secp256k1" => Ok(Curve::Secp256k1),
            other => Err(RolaError::UnsupportedCurve(other.to_string())),
        }
    }
}

/// Verify a hex-encoded signature over `message_hash`.
///
/// The curve is resolved first, so an unsupported curve is reported without
/// touching the key or signature.
pub fn verify_proof(
    curve: &str,
    public_key_hex: &str,
    signature_hex: &str,
    message_hash: &[u8; 32],
) -> Result<Curve, RolaError> {
    let curve: Curve = curve.parse()?;
    match curve {
        Curve::Curve25519 => verify_ed25519(public_key_hex, signature_hex, message_hash)?,
        Curve::Secp256k1 => verify_secp256k1(public_key_hex, signature_hex, message_hash)?,
    }
    Ok(curve)
}

fn decode_public_key(public_key_hex: &str) -> Result<Vec<u8>, RolaError> {
    hex::decode(public_key_hex)
        .map_err(|e| RolaError::InvalidPublicKey(format!("not valid hex: {e}")))
}

fn decode_signature(signature_hex: &str) -> Result<Vec<u8>, RolaError> {
    hex::decode(signature_hex)
        .map_err(|e| RolaError::InvalidSignature(format!("not valid hex: {e}")))
}

fn verify_ed25519(
    public_key_hex: &str,
    signature_hex: &str,
    message_hash: &[u8; 32],
) -> Result<(), RolaError> {
    let public_key_bytes = decode_public_key(public_key_hex)?;
    let public_key = ed25519_dalek::VerifyingKey::try_from(public_key_bytes.as_slice())
        .map_err(|e| RolaError::InvalidPublicKey(e.to_string()))?;

    let signature_bytes = decode_signature(signature_hex)?;
    let signature = ed25519_dalek::Signature::from_slice(&signature_bytes)
        .map_err(|e| RolaError::InvalidSignature(e.to_string()))?;

    // Strict verification rejects small-order keys and non-canonical R.
    public_key
        .verify_strict(message_hash, &signature)
        .map_err(|_| RolaError::InvalidSignature("Ed25519 verification failed".to_string()))
}

fn verify_secp256k1(
    public_key_hex: &str,
    signature_hex: &str,
    message_hash: &[u8; 32],
) -> Result<(), RolaError> {
    let public_key_bytes = decode_public_key(public_key_hex)?;
    let public_key = k256::ecdsa::VerifyingKey::from_sec1_bytes(&public_key_bytes)
        .map_err(|e| RolaError::InvalidPublicKey(e.to_string()))?;

    let signature_bytes = decode_signature(signature_hex)?;
    let signature = match signature_bytes.len() {
        64 => k256::ecdsa::Signature::from_slice(&signature_bytes),
        // Wallet layout: recovery id followed by r‖s
        65 => k256::ecdsa::Signature::from_slice(&signature_bytes[1..]),
        _ => k256::ecdsa::Signature::from_der(&signature_bytes),
    }
    .map_err(|e| RolaError::InvalidSignature(e.to_string()))?;
    // k256 only accepts low-S signatures.
    let signature = signature.normalize_s().unwrap_or(signature);

    public_key
        .verify_prehash(message_hash, &signature)
        .map_err(|_| RolaError::InvalidSignature("secp256k1 verification failed".to_string()))
}
