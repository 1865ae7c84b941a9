// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet-side helpers for tests: deterministic keys and signed challenges.

use ed25519_dalek::Signer;

use super::signature_message::create_signature_message;
use super::types::{Proof, SignedChallenge};

pub const DAPP_DEFINITION_ADDRESS: &str =
    "account_tdx_2_12yf9gd53yfep7a669fv2t3wm7nz9zeezwd04n02a433ker8vza6rhe";
pub const EXPECTED_ORIGIN: &str = "http://localhost:4000";

pub fn ed25519_key(seed: u8) -> ed25519_dalek::SigningKey {
    ed25519_dalek::SigningKey::from_bytes(&[seed; 32])
}

pub fn secp256k1_key(seed: u8) -> k256::ecdsa::SigningKey {
    k256::ecdsa::SigningKey::from_slice(&[seed; 32]).unwrap()
}

/// Sign `challenge` for the test deployment with an Ed25519 key.
pub fn sign_ed25519(key: &ed25519_dalek::SigningKey, challenge: &str) -> SignedChallenge {
    let hash =
        create_signature_message(challenge, DAPP_DEFINITION_ADDRESS, EXPECTED_ORIGIN).unwrap();
    let signature = key.sign(&hash);

    SignedChallenge {
        challenge: challenge.to_string(),
        proof: Proof {
            public_key: hex::encode(key.verifying_key().to_bytes()),
            signature: hex::encode(signature.to_bytes()),
            curve: "curve25519".to_string(),
        },
        address: None,
        kind: None,
    }
}

/// Sign `challenge` for the test deployment with a secp256k1 key, using the
/// wallet's 65-byte `v‖r‖s` layout and a compressed public key.
pub fn sign_secp256k1(key: &k256::ecdsa::SigningKey, challenge: &str) -> SignedChallenge {
    let hash =
        create_signature_message(challenge, DAPP_DEFINITION_ADDRESS, EXPECTED_ORIGIN).unwrap();
    let (signature, recovery_id) = key.sign_prehash_recoverable(&hash).unwrap();
    let mut signature_bytes = vec![recovery_id.to_byte()];
    signature_bytes.extend_from_slice(&signature.to_bytes());

    SignedChallenge {
        challenge: challenge.to_string(),
        proof: Proof {
            public_key: hex::encode(key.verifying_key().to_encoded_point(true).as_bytes()),
            signature: hex::encode(signature_bytes),
            curve: "secp256k1".to_string(),
        },
        address: None,
        kind: None,
    }
}
