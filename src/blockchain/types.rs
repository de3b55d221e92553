// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Decimal precision of TRX (1 TRX = 1_000_000 sun).
pub const TRX_DECIMALS: u8 = 6;

/// BIP-44 derivation path prefix for Tron (coin type 195).
pub const TRON_BIP_PATH: &str = "44'/195'/0'/0/";

/// Blockchain tag carried by networks, accounts and tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Blockchain {
    Trx,
    Eos,
    Eth,
    Btc,
}

impl Blockchain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Blockchain::Trx => "trx",
            Blockchain::Eos => "eos",
            Blockchain::Eth => "eth",
            Blockchain::Btc => "btc",
        }
    }
}

impl fmt::Display for Blockchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chain endpoint. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    /// Network name for display
    pub name: String,
    /// URL scheme (`http` / `https`)
    pub protocol: String,
    pub host: String,
    /// Port, `0` when the scheme default applies
    pub port: u16,
    pub blockchain: Blockchain,
    /// Chain identifier, may be empty for ad-hoc endpoints
    pub chain_id: String,
}

impl Network {
    pub fn new(
        name: impl Into<String>,
        protocol: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        blockchain: Blockchain,
        chain_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            protocol: protocol.into(),
            host: host.into(),
            port,
            blockchain,
            chain_id: chain_id.into(),
        }
    }

    /// Cache key. Networks with a chain id are keyed by it, endpoints without
    /// one by host and port.
    pub fn unique(&self) -> String {
        let id = if self.chain_id.is_empty() {
            format!("{}:{}", self.host, self.port)
        } else {
            format!("chain:{}", self.chain_id)
        };
        format!("{}:{}", self.blockchain, id).to_lowercase()
    }

    /// Full endpoint URL, e.g. `https://api.trongrid.io:443`.
    pub fn fullhost(&self) -> String {
        if self.port == 0 {
            format!("{}://{}", self.protocol, self.host)
        } else {
            format!("{}://{}:{}", self.protocol, self.host, self.port)
        }
    }
}

/// Tron Mainnet, the network the adapter vouches for.
pub fn endorsed_network() -> Network {
    Network::new("Tron Mainnet", "https", "api.trongrid.io", 443, Blockchain::Trx, "1")
}

/// A public address bound to a network. Owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Base58check address (`T...`)
    pub public_key: String,
    #[serde(default)]
    pub name: String,
    pub network: Network,
    /// Key material lives on a hardware device
    #[serde(default)]
    pub hardware: bool,
}

impl Account {
    pub fn new(public_key: impl Into<String>, network: Network) -> Self {
        Self {
            public_key: public_key.into(),
            name: String::new(),
            network,
            hardware: false,
        }
    }

    pub fn hardware(mut self) -> Self {
        self.hardware = true;
        self
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Address used as the sender of outgoing transactions.
    pub fn sendable(&self) -> &str {
        &self.public_key
    }

    pub fn is_hardware(&self) -> bool {
        self.hardware
    }
}

/// A fungible asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub blockchain: Blockchain,
    /// Contract address, empty for TRX and TRC-10 assets
    #[serde(default)]
    pub contract: String,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub chain_id: String,
    /// Last fetched balance in human units
    #[serde(default)]
    pub amount: String,
    /// On-chain TRC-10 asset id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Token {
    pub fn new(
        blockchain: Blockchain,
        contract: impl Into<String>,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
        chain_id: impl Into<String>,
    ) -> Self {
        Self {
            blockchain,
            contract: contract.into(),
            symbol: symbol.into(),
            name: name.into(),
            decimals,
            chain_id: chain_id.into(),
            amount: "0".to_string(),
            key: None,
        }
    }

    /// Native TRX descriptor.
    pub fn trx() -> Self {
        Self::new(Blockchain::Trx, "trx", "TRX", "TRX", TRX_DECIMALS, "1")
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = amount.into();
        self
    }

    pub fn has_contract(&self) -> bool {
        !self.contract.is_empty()
    }

    /// Asset identity without the chain: blockchain plus contract, or symbol
    /// when the asset has no contract.
    pub fn unique(&self) -> String {
        let id = if self.has_contract() {
            &self.contract
        } else {
            &self.symbol
        };
        format!("{}:{}", self.blockchain, id).to_lowercase()
    }

    /// Full asset identity, (blockchain, contract-or-symbol, chain id).
    pub fn unique_with_chain(&self) -> String {
        format!("{}:{}", self.unique(), self.chain_id.to_lowercase())
    }

    /// Same asset, regardless of the last fetched amount.
    pub fn is_same_asset(&self, other: &Token) -> bool {
        self.unique_with_chain() == other.unique_with_chain()
    }
}

/// Block explorer URL templates; `{x}` is replaced by the looked-up value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explorer {
    pub name: String,
    pub account: String,
    pub transaction: String,
    pub block: String,
}

impl Explorer {
    pub fn account_url(&self, address: &str) -> String {
        self.account.replace("{x}", address)
    }

    pub fn transaction_url(&self, tx_id: &str) -> String {
        self.transaction.replace("{x}", tx_id)
    }

    pub fn block_url(&self, block: &str) -> String {
        self.block.replace("{x}", block)
    }
}

/// Tronscan, the default explorer.
pub fn tronscan() -> Explorer {
    Explorer {
        name: "Tronscan".to_string(),
        account: "https://tronscan.org/#/address/{x}".to_string(),
        transaction: "https://tronscan.org/#/transaction/{x}".to_string(),
        block: "https://tronscan.org/#/block/{x}".to_string(),
    }
}

/// Account shape handed back to dapps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnableAccount {
    pub address: String,
    pub blockchain: Blockchain,
}
