// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger lookup of an entity's registered owner keys.
//!
//! The authenticator only depends on [`OwnerKeyLookup`]. [`GatewayService`] is
//! the production implementation, querying a Radix Gateway:
//!
//! ```text
//! POST {base_url}/state/entity/details
//! {"addresses": ["<address>"], "aggregation_level": "Vault"}
//! ```
//!
//! and returning the `raw_hex` of the `owner_keys` metadata entry.
//!
//! ## Caching
//!
//! - Successful lookups are cached in an LRU with a short TTL
//! - Failed lookups are never cached
//! - HTTP requests time out after 10 seconds

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Default owner-key cache TTL.
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Default owner-key cache capacity (entities).
const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Gateway request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Metadata key holding an entity's owner key hashes.
const OWNER_KEYS_METADATA_KEY: &str = "owner_keys";

/// Errors from the owner-key lookup.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Gateway request failed: {0}")]
    Request(String),
    #[error("Gateway returned HTTP {0}")]
    Status(u16),
    #[error("Malformed gateway response: {0}")]
    Decode(String),
}

/// Resolves the owner keys registered on ledger for an entity address.
#[async_trait]
pub trait OwnerKeyLookup: Send + Sync {
    /// Return the hex-encoded owner keys blob, or `None` if the entity has none.
    async fn owner_keys(&self, address: &str) -> Result<Option<String>, GatewayError>;
}

#[derive(Debug, Deserialize)]
struct EntityDetailsResponse {
    items: Vec<EntityDetailsItem>,
}

#[derive(Debug, Deserialize)]
struct EntityDetailsItem {
    #[serde(default)]
    metadata: Option<EntityMetadata>,
}

#[derive(Debug, Deserialize)]
struct EntityMetadata {
    items: Vec<MetadataItem>,
}

#[derive(Debug, Deserialize)]
struct MetadataItem {
    key: String,
    value: MetadataValue,
}

#[derive(Debug, Deserialize)]
struct MetadataValue {
    raw_hex: String,
}

impl EntityDetailsResponse {
    fn owner_keys(&self) -> Option<String> {
        self.items
            .first()?
            .metadata
            .as_ref()?
            .items
            .iter()
            .find(|item| item.key == OWNER_KEYS_METADATA_KEY)
            .map(|item| item.value.raw_hex.clone())
            .filter(|raw_hex| !raw_hex.is_empty())
    }
}

struct CacheEntry {
    owner_keys: Option<String>,
    fetched_at: Instant,
}

/// Gateway-backed [`OwnerKeyLookup`] with an in-process cache.
pub struct GatewayService {
    base_url: String,
    client: reqwest::Client,
    cache: Mutex<LruCache<String, CacheEntry>>,
    cache_ttl: Duration,
}

impl GatewayService {
    /// Create a client for the Gateway at `base_url`
    /// (e.g. `https://stokenet.radixdlt.com`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(DEFAULT_CACHE_CAPACITY).unwrap_or(NonZeroUsize::MIN),
            )),
            cache_ttl: DEFAULT_CACHE_TTL,
        })
    }

    /// Override the cache TTL. `Duration::ZERO` disables caching.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn cached(&self, address: &str) -> Option<Option<String>> {
        let mut cache = self.cache.lock().ok()?;
        if let Some(entry) = cache.get(address) {
            if entry.fetched_at.elapsed() < self.cache_ttl {
                return Some(entry.owner_keys.clone());
            }
            cache.pop(address);
        }
        None
    }

    fn store(&self, address: &str, owner_keys: Option<String>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.put(
                address.to_string(),
                CacheEntry {
                    owner_keys,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    async fn fetch_owner_keys(&self, address: &str) -> Result<Option<String>, GatewayError> {
        let response = self
            .client
            .post(format!("{}/state/entity/details", self.base_url))
            .json(&json!({
                "addresses": [address],
                "aggregation_level": "Vault",
            }))
            .send()
            .await
            .map_err(|e| GatewayError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GatewayError::Status(response.status().as_u16()));
        }

        let details: EntityDetailsResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))?;

        Ok(details.owner_keys())
    }
}

#[async_trait]
impl OwnerKeyLookup for GatewayService {
    async fn owner_keys(&self, address: &str) -> Result<Option<String>, GatewayError> {
        if let Some(owner_keys) = self.cached(address) {
            return Ok(owner_keys);
        }

        let owner_keys = self.fetch_owner_keys(address).await?;
        tracing::debug!(
            address,
            found = owner_keys.is_some(),
            "Fetched owner keys from gateway"
        );
        self.store(address, owner_keys.clone());
        Ok(owner_keys)
    }
}
