// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration module for Tron.
//!
//! This module provides functionality for:
//! - Talking to Tron full nodes over the TronGrid HTTP API
//! - Converting between keys, hex and base58check addresses
//! - Querying TRX, TRC-10 and TRC-20 balances
//! - Building, signing and broadcasting transfers
//! - Decoding pending transactions for approval

pub mod address;
pub mod amount;
pub mod balance;
pub mod cache;
pub mod classify;
pub mod client;
pub mod decoder;
pub mod http;
pub mod signing;
pub mod transactions;
pub mod trc20;
pub mod types;

pub use address::{CodecError, TronAddress};
pub use classify::AssetClass;
pub use client::{TronClient, TronClientError};
pub use signing::{SignStrategy, Signature, SigningPayload};
pub use transactions::{TransferOutcome, TransferRequest};
pub use types::*;
