// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the [`AdapterConfig`] built from
//! them. A variable that is unset or does not parse leaves the default in
//! place.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `TRON_BALANCES_TIMEOUT_MS` | Wait for the account lookup in `balances_for` | `2000` |
//! | `TRON_HTTP_TIMEOUT_SECS` | Request timeout of node HTTP clients | `15` |
//! | `TRON_FEE_LIMIT_SUN` | Fee limit for contract calls, in sun | `150000000` |
//! | `TRON_APPROVAL_TIMEOUT_SECS` | Upper bound on waiting for user approval | none |
//! | `TRON_APPROVAL_ORIGIN` | Origin reported in approval requests | `wallet` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::balance::{DEFAULT_BALANCES_TIMEOUT, DEFAULT_FEE_LIMIT_SUN};
use crate::blockchain::http::DEFAULT_HTTP_TIMEOUT;
use crate::blockchain::signing::DEFAULT_ORIGIN;

/// Environment variable name for the `balances_for` account lookup timeout.
pub const BALANCES_TIMEOUT_ENV: &str = "TRON_BALANCES_TIMEOUT_MS";

/// Environment variable name for the node HTTP request timeout.
pub const HTTP_TIMEOUT_ENV: &str = "TRON_HTTP_TIMEOUT_SECS";

/// Environment variable name for the contract call fee limit.
pub const FEE_LIMIT_ENV: &str = "TRON_FEE_LIMIT_SUN";

/// Environment variable name for the approval wait bound.
///
/// # Default
/// Unset: approvals wait until answered or cancelled.
pub const APPROVAL_TIMEOUT_ENV: &str = "TRON_APPROVAL_TIMEOUT_SECS";

/// Environment variable name for the approval request origin.
pub const APPROVAL_ORIGIN_ENV: &str = "TRON_APPROVAL_ORIGIN";

/// Environment variable name for the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterConfig {
    pub balances_timeout: Duration,
    pub http_timeout: Duration,
    pub fee_limit_sun: u64,
    pub approval_timeout: Option<Duration>,
    pub approval_origin: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            balances_timeout: DEFAULT_BALANCES_TIMEOUT,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            fee_limit_sun: DEFAULT_FEE_LIMIT_SUN,
            approval_timeout: None,
            approval_origin: DEFAULT_ORIGIN.to_string(),
        }
    }
}

impl AdapterConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            balances_timeout: parse::<u64>(&lookup, BALANCES_TIMEOUT_ENV)
                .map(Duration::from_millis)
                .unwrap_or(defaults.balances_timeout),
            http_timeout: parse::<u64>(&lookup, HTTP_TIMEOUT_ENV)
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
            fee_limit_sun: parse(&lookup, FEE_LIMIT_ENV).unwrap_or(defaults.fee_limit_sun),
            approval_timeout: parse::<u64>(&lookup, APPROVAL_TIMEOUT_ENV)
                .map(Duration::from_secs)
                .or(defaults.approval_timeout),
            approval_origin: lookup(APPROVAL_ORIGIN_ENV)
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .unwrap_or(defaults.approval_origin),
        }
    }
}

fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
    lookup(name).and_then(|value| value.trim().parse().ok())
}

/// Install a global tracing subscriber driven by `RUST_LOG` and `LOG_FORMAT`.
///
/// Returns `false` if the host already installed one.
pub fn init_tracing() -> bool {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let installed = if env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true))
            .try_init()
    };

    installed.is_ok()
}
