// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ROLA Server - Off-Ledger Authentication Service
//!
//! Issues single-use challenges and verifies wallet signatures over them, so a
//! dApp can prove that a user controls the keys behind a persona or account
//! without submitting a transaction.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `rola` - Challenge store, signing message, signature verification
//! - `sweeper` - Background pruning of expired challenges

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod rola;
pub mod state;
pub mod sweeper;
