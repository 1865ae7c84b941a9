// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `DAPP_DEFINITION_ADDRESS` | Relying-party address bound into signing messages | Stokenet example account |
//! | `EXPECTED_ORIGIN` | Origin bound into signing messages | `http://localhost:4000` |
//! | `GATEWAY_URL` | Gateway base URL; enables the owner-key check when set | Unset |
//! | `CHALLENGE_TTL_SECS` | Challenge lifetime in seconds | `300` |
//! | `SWEEP_INTERVAL_SECS` | Expired-challenge sweep interval in seconds | `60` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DAPP_DEFINITION_ADDRESS_ENV: &str = "DAPP_DEFINITION_ADDRESS";
pub const EXPECTED_ORIGIN_ENV: &str = "EXPECTED_ORIGIN";

/// Environment variable name for the Gateway base URL.
///
/// When unset the server only checks signatures; when set every proof must
/// carry an entity address whose on-ledger owner keys include the signing key.
pub const GATEWAY_URL_ENV: &str = "GATEWAY_URL";

pub const CHALLENGE_TTL_SECS_ENV: &str = "CHALLENGE_TTL_SECS";
pub const SWEEP_INTERVAL_SECS_ENV: &str = "SWEEP_INTERVAL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DAPP_DEFINITION_ADDRESS: &str =
    "account_tdx_2_12yf9gd53yfep7a669fv2t3wm7nz9zeezwd04n02a433ker8vza6rhe";
pub const DEFAULT_EXPECTED_ORIGIN: &str = "http://localhost:4000";
pub const DEFAULT_CHALLENGE_TTL: Duration = crate::rola::DEFAULT_CHALLENGE_TTL;
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Upper bound on `CHALLENGE_TTL_SECS`.
const MAX_CHALLENGE_TTL_SECS: u64 = crate::rola::MAX_CHALLENGE_TTL.as_secs();

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("DAPP_DEFINITION_ADDRESS is {0} bytes, at most 255 allowed")]
    AddressTooLong(usize),
    #[error("GATEWAY_URL is not a valid URL: {0}")]
    InvalidGatewayUrl(String),
}

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON output; anything else is pretty.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(format) if format.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    /// Read `LOG_FORMAT` directly, for use before the full config is loaded.
    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct RolaConfig {
    pub host: String,
    pub port: u16,
    pub dapp_definition_address: String,
    pub expected_origin: String,
    pub gateway_url: Option<Url>,
    pub challenge_ttl: Duration,
    pub sweep_interval: Duration,
    pub log_format: LogFormat,
}

impl RolaConfig {
    /// Load configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| var(key).filter(|value| !value.trim().is_empty());

        let dapp_definition_address = non_empty(DAPP_DEFINITION_ADDRESS_ENV)
            .map(|address| address.trim().to_string())
            .unwrap_or_else(|| DEFAULT_DAPP_DEFINITION_ADDRESS.to_string());
        if dapp_definition_address.len() > usize::from(u8::MAX) {
            return Err(ConfigError::AddressTooLong(dapp_definition_address.len()));
        }

        let gateway_url = non_empty(GATEWAY_URL_ENV)
            .map(|raw| Url::parse(&raw).map_err(|e| ConfigError::InvalidGatewayUrl(e.to_string())))
            .transpose()?;

        let challenge_ttl_secs = parse_or_default(
            CHALLENGE_TTL_SECS_ENV,
            non_empty(CHALLENGE_TTL_SECS_ENV),
            DEFAULT_CHALLENGE_TTL.as_secs(),
        )
        .min(MAX_CHALLENGE_TTL_SECS);

        let sweep_interval_secs = parse_or_default(
            SWEEP_INTERVAL_SECS_ENV,
            non_empty(SWEEP_INTERVAL_SECS_ENV),
            DEFAULT_SWEEP_INTERVAL.as_secs(),
        )
        .max(1);

        let log_format = LogFormat::parse(var(LOG_FORMAT_ENV).as_deref());

        Ok(Self {
            host: non_empty(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or_default(PORT_ENV, non_empty(PORT_ENV), DEFAULT_PORT),
            dapp_definition_address,
            expected_origin: non_empty(EXPECTED_ORIGIN_ENV)
                .unwrap_or_else(|| DEFAULT_EXPECTED_ORIGIN.to_string()),
            gateway_url,
            challenge_ttl: Duration::from_secs(challenge_ttl_secs),
            sweep_interval: Duration::from_secs(sweep_interval_secs),
            log_format,
        })
    }

    /// `host:port` string for binding the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or_default<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = key, value = %raw, default = %default, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
