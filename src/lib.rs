// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Wallet - Tron Blockchain Adapter
//!
//! Lets the multi-chain wallet host query balances, build and sign transfers,
//! and decode pending transactions on Tron.
//!
//! ## Modules
//!
//! - `adapter` - The [`TronAdapter`] facade handed to the host
//! - `blockchain` - Tron integration (client, codec, balances, transfers, signing)
//! - `config` - Environment configuration and tracing setup
//! - `error` - Adapter error type and the `{error}` body

pub mod adapter;
pub mod blockchain;
pub mod config;
pub mod error;

#[cfg(test)]
mod testing;

pub use adapter::TronAdapter;
pub use config::AdapterConfig;
pub use error::{AdapterError, ErrorBody};
