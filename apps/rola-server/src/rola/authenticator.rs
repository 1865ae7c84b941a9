// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Proof-set authentication.
//!
//! ## Order of checks
//!
//! 1. Every distinct challenge in the set is consumed from the store
//! 2. The signing-message hash is rebuilt for each proof
//! 3. Each signature is verified
//! 4. If an owner-key lookup is configured, each key must be a registered
//!    owner key of the proof's entity
//!
//! Authentication is all-or-nothing. Challenges consumed in step 1 stay
//! consumed when a later step fails, so a proof with a bad signature still
//! burns its challenge.

use std::collections::HashSet;
use std::sync::Arc;

use super::challenge_store::ChallengeStore;
use super::error::RolaError;
use super::gateway::OwnerKeyLookup;
use super::signature_message::{blake2b_256, create_signature_message};
use super::types::{SignedChallenge, VerifiedProof};
use super::verify_proof::verify_proof;

/// Number of trailing hash bytes used for an owner key hash.
const PUBLIC_KEY_HASH_BYTES: usize = 29;

/// ROLA verifier bound to one dApp deployment.
pub struct Rola {
    challenges: Arc<ChallengeStore>,
    /// Relying-party identifier bound into every signing message
    dapp_definition_address: String,
    /// Fixed per deployment; never taken from the request
    expected_origin: String,
    owner_keys: Option<Arc<dyn OwnerKeyLookup>>,
}

impl Rola {
    pub fn new(
        challenges: Arc<ChallengeStore>,
        dapp_definition_address: impl Into<String>,
        expected_origin: impl Into<String>,
    ) -> Self {
        Self {
            challenges,
            dapp_definition_address: dapp_definition_address.into(),
            expected_origin: expected_origin.into(),
            owner_keys: None,
        }
    }

    /// Require each verified key to be a registered owner key of its entity.
    pub fn with_owner_key_lookup(mut self, lookup: Arc<dyn OwnerKeyLookup>) -> Self {
        self.owner_keys = Some(lookup);
        self
    }

    pub fn challenges(&self) -> &Arc<ChallengeStore> {
        &self.challenges
    }

    pub fn owner_key_check_enabled(&self) -> bool {
        self.owner_keys.is_some()
    }

    /// Authenticate a proof set. Succeeds only if every proof verifies.
    pub async fn authenticate(
        &self,
        proofs: &[SignedChallenge],
    ) -> Result<Vec<VerifiedProof>, RolaError> {
        if proofs.is_empty() {
            return Err(RolaError::EmptyProofSet);
        }

        self.consume_challenges(proofs)?;

        let verified = proofs
            .iter()
            .map(|signed| self.verify_signed_challenge(signed))
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(lookup) = &self.owner_keys {
            for proof in &verified {
                check_owner_key(lookup.as_ref(), proof).await?;
            }
        }

        Ok(verified)
    }

    /// Consume each distinct challenge exactly once.
    ///
    /// Every distinct challenge is consumed even after one has failed, so a
    /// rejected set never leaves part of its challenges reusable.
    fn consume_challenges(&self, proofs: &[SignedChallenge]) -> Result<(), RolaError> {
        let mut seen = HashSet::new();
        let mut all_valid = true;

        for signed in proofs {
            if seen.insert(signed.challenge.as_str()) {
                let valid = self.challenges.verify_and_consume(&signed.challenge);
                all_valid &= valid;
            }
        }

        if all_valid {
            Ok(())
        } else {
            Err(RolaError::ChallengeInvalidOrExpired)
        }
    }

    fn verify_signed_challenge(&self, signed: &SignedChallenge) -> Result<VerifiedProof, RolaError> {
        let message_hash = create_signature_message(
            &signed.challenge,
            &self.dapp_definition_address,
            &self.expected_origin,
        )?;

        let curve = verify_proof(
            &signed.proof.curve,
            &signed.proof.public_key,
            &signed.proof.signature,
            &message_hash,
        )?;

        Ok(VerifiedProof {
            challenge: signed.challenge.clone(),
            curve,
            public_key: signed.proof.public_key.clone(),
            address: signed.address.clone(),
        })
    }
}

/// Owner key hash of a hex public key: the last 29 bytes of its BLAKE2b-256
/// digest, hex-encoded.
pub fn public_key_hash(public_key_hex: &str) -> Result<String, RolaError> {
    let public_key = hex::decode(public_key_hex)
        .map_err(|e| RolaError::InvalidPublicKey(format!("not valid hex: {e}")))?;
    let digest = blake2b_256(&public_key);
    Ok(hex::encode(&digest[digest.len() - PUBLIC_KEY_HASH_BYTES..]))
}

async fn check_owner_key(lookup: &dyn OwnerKeyLookup, proof: &VerifiedProof) -> Result<(), RolaError> {
    let Some(address) = proof.address.as_deref() else {
        return Err(RolaError::KeyNotAuthorized("proof has no entity address".to_string()));
    };

    let owner_keys = match lookup.owner_keys(address).await {
        Ok(Some(owner_keys)) => owner_keys,
        Ok(None) => {
            return Err(RolaError::KeyNotAuthorized(format!(
                "{address} has no registered owner keys"
            )))
        }
        Err(e) => {
            tracing::warn!(address, error = %e, "Owner key lookup failed");
            return Err(RolaError::KeyNotAuthorized(address.to_string()));
        }
    };

    let key_hash = public_key_hash(&proof.public_key)?;
    if owner_keys.to_ascii_lowercase().contains(&key_hash) {
        Ok(())
    } else {
        Err(RolaError::KeyNotAuthorized(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rola::gateway::GatewayError;
    use crate::rola::testing::{
        ed25519_key, secp256k1_key, sign_ed25519, sign_secp256k1, DAPP_DEFINITION_ADDRESS,
        EXPECTED_ORIGIN,
    };
    use crate::rola::verify_proof::Curve;
    use std::time::Duration;

    const ACCOUNT: &str = "account_tdx_2_12xdm5g7xdhh73zkh7xkty0dsxw4rw0jl0sq4lr3erpc3xg5nq6kpc";

    fn rola() -> Rola {
        Rola::new(
            Arc::new(ChallengeStore::new()),
            DAPP_DEFINITION_ADDRESS,
            EXPECTED_ORIGIN,
        )
    }

    fn corrupt_signature(signed: &mut SignedChallenge) {
        let mut bytes = hex::decode(&signed.proof.signature).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0x01;
        signed.proof.signature = hex::encode(bytes);
    }

    /// Owner-key lookup returning a fixed answer.
    enum StaticLookup {
        Keys(Option<String>),
        Fails,
    }

    #[async_trait::async_trait]
    impl OwnerKeyLookup for StaticLookup {
        async fn owner_keys(&self, _address: &str) -> Result<Option<String>, GatewayError> {
            match self {
                StaticLookup::Keys(keys) => Ok(keys.clone()),
                StaticLookup::Fails => Err(GatewayError::Status(503)),
            }
        }
    }

    #[tokio::test]
    async fn single_ed25519_proof_authenticates() {
        let rola = rola();
        let challenge = rola.challenges().create().unwrap();
        let signed = sign_ed25519(&ed25519_key(1), &challenge);

        let verified = rola.authenticate(&[signed]).await.unwrap();
        assert_eq!(verified.len(), 1);
        assert_eq!(verified[0].curve, Curve::Curve25519);
        assert_eq!(verified[0].challenge, challenge);
        assert!(rola.challenges().is_empty());
    }

    #[tokio::test]
    async fn single_secp256k1_proof_authenticates() {
        let rola = rola();
        let challenge = rola.challenges().create().unwrap();
        let signed = sign_secp256k1(&secp256k1_key(3), &challenge);

        let verified = rola.authenticate(&[signed]).await.unwrap();
        assert_eq!(verified[0].curve, Curve::Secp256k1);
    }

    #[tokio::test]
    async fn replayed_proof_is_rejected() {
        let rola = rola();
        let challenge = rola.challenges().create().unwrap();
        let signed = sign_ed25519(&ed25519_key(1), &challenge);

        assert!(rola.authenticate(std::slice::from_ref(&signed)).await.is_ok());
        assert_eq!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::ChallengeInvalidOrExpired
        );
    }

    #[tokio::test]
    async fn unknown_challenge_is_rejected() {
        let rola = rola();
        let signed = sign_ed25519(&ed25519_key(1), &"ab".repeat(32));
        assert_eq!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::ChallengeInvalidOrExpired
        );
    }

    #[tokio::test]
    async fn expired_challenge_is_rejected() {
        let rola = Rola::new(
            Arc::new(ChallengeStore::with_ttl(Duration::ZERO)),
            DAPP_DEFINITION_ADDRESS,
            EXPECTED_ORIGIN,
        );
        let challenge = rola.challenges().create().unwrap();
        let signed = sign_ed25519(&ed25519_key(1), &challenge);

        assert_eq!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::ChallengeInvalidOrExpired
        );
        assert!(rola.challenges().is_empty());
    }

    #[tokio::test]
    async fn empty_proof_set_is_rejected() {
        assert_eq!(
            rola().authenticate(&[]).await.unwrap_err(),
            RolaError::EmptyProofSet
        );
    }

    #[tokio::test]
    async fn one_bad_signature_fails_the_whole_set() {
        let rola = rola();
        let first = rola.challenges().create().unwrap();
        let second = rola.challenges().create().unwrap();

        let good = sign_ed25519(&ed25519_key(1), &first);
        let mut bad = sign_ed25519(&ed25519_key(2), &second);
        corrupt_signature(&mut bad);

        let err = rola.authenticate(&[good, bad]).await.unwrap_err();
        assert!(matches!(err, RolaError::InvalidSignature(_)));
        // Both challenges were burned by the failed attempt.
        assert!(rola.challenges().is_empty());
    }

    #[tokio::test]
    async fn mixed_curves_in_one_set() {
        let rola = rola();
        let first = rola.challenges().create().unwrap();
        let second = rola.challenges().create().unwrap();

        let proofs = [
            sign_ed25519(&ed25519_key(1), &first),
            sign_secp256k1(&secp256k1_key(4), &second),
        ];
        let verified = rola.authenticate(&proofs).await.unwrap();
        assert_eq!(
            verified.iter().map(|p| p.curve).collect::<Vec<_>>(),
            vec![Curve::Curve25519, Curve::Secp256k1]
        );
    }

    #[tokio::test]
    async fn shared_challenge_is_consumed_once() {
        let rola = rola();
        let challenge = rola.challenges().create().unwrap();

        // Persona and account proofs over the same challenge.
        let proofs = [
            sign_ed25519(&ed25519_key(1), &challenge),
            sign_ed25519(&ed25519_key(2), &challenge),
        ];
        assert_eq!(rola.authenticate(&proofs).await.unwrap().len(), 2);
        assert!(rola.challenges().is_empty());
    }

    #[tokio::test]
    async fn every_distinct_challenge_is_burned_when_one_is_invalid() {
        let rola = rola();
        let live = rola.challenges().create().unwrap();

        let proofs = [
            sign_ed25519(&ed25519_key(1), &"cd".repeat(32)),
            sign_ed25519(&ed25519_key(1), &live),
        ];
        assert_eq!(
            rola.authenticate(&proofs).await.unwrap_err(),
            RolaError::ChallengeInvalidOrExpired
        );
        assert!(!rola.challenges().verify_and_consume(&live));
    }

    #[tokio::test]
    async fn unsupported_curve_still_burns_the_challenge() {
        // The challenge is consumed before any cryptographic check, so a proof
        // rejected for its curve cannot be retried with the same challenge.
        let rola = rola();
        let challenge = rola.challenges().create().unwrap();
        let mut signed = sign_ed25519(&ed25519_key(1), &challenge);
        signed.proof.curve = "ed448".to_string();

        assert_eq!(
            rola.authenticate(std::slice::from_ref(&signed)).await.unwrap_err(),
            RolaError::UnsupportedCurve("ed448".to_string())
        );

        signed.proof.curve = "curve25519".to_string();
        assert_eq!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::ChallengeInvalidOrExpired
        );
    }

    #[tokio::test]
    async fn invalid_signature_burns_the_challenge() {
        let rola = rola();
        let challenge = rola.challenges().create().unwrap();
        let good = sign_ed25519(&ed25519_key(1), &challenge);
        let mut bad = good.clone();
        corrupt_signature(&mut bad);

        assert!(matches!(
            rola.authenticate(&[bad]).await.unwrap_err(),
            RolaError::InvalidSignature(_)
        ));
        assert_eq!(
            rola.authenticate(&[good]).await.unwrap_err(),
            RolaError::ChallengeInvalidOrExpired
        );
    }

    #[tokio::test]
    async fn signature_for_other_origin_is_rejected() {
        let rola = rola();
        let challenge = rola.challenges().create().unwrap();
        let key = ed25519_key(1);
        let hash =
            create_signature_message(&challenge, DAPP_DEFINITION_ADDRESS, "https://evil.example")
                .unwrap();
        let mut signed = sign_ed25519(&key, &challenge);
        signed.proof.signature = hex::encode(ed25519_dalek::Signer::sign(&key, &hash).to_bytes());

        assert!(matches!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::InvalidSignature(_)
        ));
    }

    #[test]
    fn public_key_hash_is_last_29_bytes() {
        let public_key = "00".repeat(32);
        let digest = blake2b_256(&[0u8; 32]);
        let hash = public_key_hash(&public_key).unwrap();
        assert_eq!(hash.len(), 58);
        assert_eq!(hash, hex::encode(&digest[3..]));

        assert!(matches!(
            public_key_hash("xyz").unwrap_err(),
            RolaError::InvalidPublicKey(_)
        ));
    }

    #[tokio::test]
    async fn owner_key_match_authenticates() {
        let key = ed25519_key(1);
        let public_key_hex = hex::encode(key.verifying_key().to_bytes());
        // SBOR-ish framing around the upper-cased hash, as the gateway returns it.
        let owner_keys = format!(
            "5c2023220101{}",
            public_key_hash(&public_key_hex).unwrap().to_uppercase()
        );
        let rola = rola().with_owner_key_lookup(Arc::new(StaticLookup::Keys(Some(owner_keys))));
        assert!(rola.owner_key_check_enabled());

        let challenge = rola.challenges().create().unwrap();
        let mut signed = sign_ed25519(&key, &challenge);
        signed.address = Some(ACCOUNT.to_string());

        assert!(rola.authenticate(&[signed]).await.is_ok());
    }

    #[tokio::test]
    async fn owner_key_mismatch_is_not_authorized() {
        let other = hex::encode(ed25519_key(9).verifying_key().to_bytes());
        let owner_keys = public_key_hash(&other).unwrap();
        let rola = rola().with_owner_key_lookup(Arc::new(StaticLookup::Keys(Some(owner_keys))));

        let challenge = rola.challenges().create().unwrap();
        let mut signed = sign_ed25519(&ed25519_key(1), &challenge);
        signed.address = Some(ACCOUNT.to_string());

        assert_eq!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::KeyNotAuthorized(ACCOUNT.to_string())
        );
    }

    #[tokio::test]
    async fn absent_owner_keys_are_not_authorized() {
        let rola = rola().with_owner_key_lookup(Arc::new(StaticLookup::Keys(None)));
        let challenge = rola.challenges().create().unwrap();
        let mut signed = sign_ed25519(&ed25519_key(1), &challenge);
        signed.address = Some(ACCOUNT.to_string());

        assert!(matches!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::KeyNotAuthorized(_)
        ));
    }

    #[tokio::test]
    async fn lookup_failure_is_not_authorized() {
        let rola = rola().with_owner_key_lookup(Arc::new(StaticLookup::Fails));
        let challenge = rola.challenges().create().unwrap();
        let mut signed = sign_secp256k1(&secp256k1_key(5), &challenge);
        signed.address = Some(ACCOUNT.to_string());

        assert_eq!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::KeyNotAuthorized(ACCOUNT.to_string())
        );
    }

    #[tokio::test]
    async fn missing_address_is_not_authorized_when_checking_owner_keys() {
        let rola = rola().with_owner_key_lookup(Arc::new(StaticLookup::Keys(Some("00".into()))));
        let challenge = rola.challenges().create().unwrap();
        let signed = sign_ed25519(&ed25519_key(1), &challenge);

        assert!(matches!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::KeyNotAuthorized(_)
        ));
    }

    #[tokio::test]
    async fn owner_check_skipped_when_signature_fails() {
        // A lookup that would fail is never reached when a signature is bad.
        let rola = rola().with_owner_key_lookup(Arc::new(StaticLookup::Fails));
        let challenge = rola.challenges().create().unwrap();
        let mut signed = sign_ed25519(&ed25519_key(1), &challenge);
        signed.address = Some(ACCOUNT.to_string());
        corrupt_signature(&mut signed);

        assert!(matches!(
            rola.authenticate(&[signed]).await.unwrap_err(),
            RolaError::InvalidSignature(_)
        ));
    }
}
