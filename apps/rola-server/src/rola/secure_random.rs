// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge token generation from the operating system CSPRNG.

use rand::rngs::OsRng;
use rand::TryRngCore;

use super::error::RolaError;

/// Number of random bytes in a ROLA challenge (64 hex characters).
pub const CHALLENGE_BYTES: usize = 32;

/// Generate `len` cryptographically secure random bytes, hex-encoded.
///
/// Reads straight from the OS entropy source rather than a userspace PRNG so a
/// failure surfaces as [`RolaError::EntropySourceUnavailable`] instead of a panic.
pub fn secure_random(len: usize) -> Result<String, RolaError> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RolaError::EntropySourceUnavailable(e.to_string()))?;
    Ok(hex::encode(bytes))
}
