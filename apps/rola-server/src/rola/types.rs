// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Proof types exchanged with wallets.
//!
//! Field names follow the dApp toolkit's `SignedChallenge` JSON so a wallet
//! response can be posted to `/verify` unchanged.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::verify_proof::Curve;

/// Kind of entity a proof was produced for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProofKind {
    Persona,
    Account,
}

/// Signature material for one challenge.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proof {
    /// Hex-encoded public key.
    pub public_key: String,
    /// Hex-encoded signature over the signing-message hash.
    pub signature: String,
    /// Curve identifier (`curve25519` or `secp256k1`).
    ///
    /// Kept as a string so an unknown curve is a verification failure rather
    /// than a request decoding error.
    pub curve: String,
}

/// One wallet-signed challenge, as submitted to `/verify`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct SignedChallenge {
    /// Hex challenge previously issued by `/create-challenge`.
    pub challenge: String,
    pub proof: Proof,
    /// Entity (account or persona) address the key claims to own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ProofKind>,
}

/// A proof that passed every check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedProof {
    pub challenge: String,
    pub curve: Curve,
    pub public_key: String,
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_wallet_json() {
        let json = r#"{
            "challenge": "ab",
            "proof": {"publicKey": "01", "signature": "02", "curve": "curve25519"},
            "address": "account_tdx_2_1abc",
            "type": "account"
        }"#;
        let signed: SignedChallenge = serde_json::from_str(json).unwrap();
        assert_eq!(signed.challenge, "ab");
        assert_eq!(signed.proof.public_key, "01");
        assert_eq!(signed.proof.curve, "curve25519");
        assert_eq!(signed.address.as_deref(), Some("account_tdx_2_1abc"));
        assert_eq!(signed.kind, Some(ProofKind::Account));
    }

    #[test]
    fn address_and_type_are_optional() {
        let json = r#"{"challenge": "ab", "proof": {"publicKey": "01", "signature": "02", "curve": "ed448"}}"#;
        let signed: SignedChallenge = serde_json::from_str(json).unwrap();
        assert!(signed.address.is_none());
        assert!(signed.kind.is_none());
        // Unknown curves survive decoding.
        assert_eq!(signed.proof.curve, "ed448");
    }
}
