// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical ROLA signing message.
//!
//! Wire format:
//!
//! | Field        | Size | Description                                  |
//! |--------------|------|----------------------------------------------|
//! | prefix       | 1    | ASCII `R` (0x52)                             |
//! | challenge    | 32   | Hex-decoded challenge bytes                  |
//! | address_len  | 1    | Byte length of the dApp definition address   |
//! | address      | var  | UTF-8 dApp definition address                |
//! | origin       | var  | UTF-8 origin, runs to the end of the buffer  |
//!
//! The wallet signs the BLAKE2b-256 digest of this buffer, never the buffer
//! itself. Any change here breaks interoperability with every wallet.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};

use super::error::RolaError;

/// BLAKE2b with a 256-bit output.
pub type Blake2b256 = Blake2b<U32>;

/// Leading byte of every ROLA signing message.
pub const MESSAGE_PREFIX: u8 = b'R';

/// Hash `data` with BLAKE2b-256.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    Blake2b256::digest(data).into()
}

/// Build the pre-hash signing message for a challenge.
///
/// # Errors
///
/// Returns `RolaError::MessageHashingFailed` if:
/// - `challenge` is not valid hex
/// - `dapp_definition_address` is longer than 255 bytes
pub fn signature_message_bytes(
    challenge: &str,
    dapp_definition_address: &str,
    origin: &str,
) -> Result<Vec<u8>, RolaError> {
    let challenge_bytes = hex::decode(challenge).map_err(|e| {
        RolaError::MessageHashingFailed(format!("challenge is not valid hex: {e}"))
    })?;

    let address_len = u8::try_from(dapp_definition_address.len()).map_err(|_| {
        RolaError::MessageHashingFailed(format!(
            "dApp definition address is {} bytes, at most 255 allowed",
            dapp_definition_address.len()
        ))
    })?;

    let mut message = Vec::with_capacity(
        1 + challenge_bytes.len() + 1 + dapp_definition_address.len() + origin.len(),
    );
    message.push(MESSAGE_PREFIX);
    message.extend_from_slice(&challenge_bytes);
    message.push(address_len);
    message.extend_from_slice(dapp_definition_address.as_bytes());
    message.extend_from_slice(origin.as_bytes());

    Ok(message)
}

/// Build and hash the signing message; the result is what wallets sign.
pub fn create_signature_message(
    challenge: &str,
    dapp_definition_address: &str,
    origin: &str,
) -> Result<[u8; 32], RolaError> {
    let message = signature_message_bytes(challenge, dapp_definition_address, origin)?;
    Ok(blake2b_256(&message))
}
