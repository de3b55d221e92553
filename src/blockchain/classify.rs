// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Asset classification: which transfer protocol a token uses.

use serde::{Deserialize, Serialize};

use super::types::Token;

/// The three Tron asset classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// TRX
    Native,
    /// TRC-10, registered on the platform without a contract
    FirstClassToken,
    /// TRC-20, implemented by a smart contract
    ContractToken,
}

impl AssetClass {
    /// Classify `token` against the adapter's native descriptor.
    pub fn of(token: &Token, native: &Token) -> Self {
        if token.is_same_asset(native) {
            AssetClass::Native
        } else if !token.has_contract() {
            AssetClass::FirstClassToken
        } else {
            AssetClass::ContractToken
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Native => "TRX",
            AssetClass::FirstClassToken => "TRC10",
            AssetClass::ContractToken => "TRC20",
        }
    }
}
