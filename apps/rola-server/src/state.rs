// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::config::{DEFAULT_DAPP_DEFINITION_ADDRESS, DEFAULT_EXPECTED_ORIGIN};
use crate::rola::{ChallengeStore, Rola};

#[derive(Clone)]
pub struct AppState {
    pub challenges: Arc<ChallengeStore>,
    pub rola: Arc<Rola>,
}

impl AppState {
    pub fn new(rola: Rola) -> Self {
        Self {
            challenges: rola.challenges().clone(),
            rola: Arc::new(rola),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Rola::new(
            Arc::new(ChallengeStore::new()),
            DEFAULT_DAPP_DEFINITION_ADDRESS,
            DEFAULT_EXPECTED_ORIGIN,
        ))
    }
}
