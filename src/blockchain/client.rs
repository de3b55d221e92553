// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tron ledger client capability and the wire types it exchanges.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Ledger RPC used by the adapter, one instance per network.
#[async_trait]
pub trait TronClient: Send + Sync {
    /// Native balance in sun.
    async fn get_balance(&self, address: &str) -> Result<u64, TronClientError>;

    /// Account state: native balance plus TRC-10 holdings.
    async fn get_account(&self, address: &str) -> Result<AccountInfo, TronClientError>;

    /// TRC-10 asset descriptor by id.
    async fn get_token_by_id(&self, id: &str) -> Result<AssetIssue, TronClientError>;

    /// Deployed contract at `address`; fails if nothing is deployed there.
    async fn get_contract(&self, address: &str) -> Result<SmartContract, TronClientError>;

    /// Unsigned TRX transfer of `amount` sun.
    async fn send_trx(&self, to: &str, amount: u64, from: &str)
        -> Result<Transaction, TronClientError>;

    /// Unsigned TRC-10 transfer of `amount` base units of `token_id`.
    async fn send_token(
        &self,
        to: &str,
        amount: u64,
        token_id: &str,
        from: &str,
    ) -> Result<Transaction, TronClientError>;

    /// Build an unsigned contract invocation.
    async fn trigger_smart_contract(
        &self,
        call: &ContractCall,
    ) -> Result<TriggerResponse, TronClientError>;

    /// Execute a read-only contract call, returning each raw result word.
    async fn trigger_constant_contract(
        &self,
        call: &ContractCall,
    ) -> Result<Vec<Vec<u8>>, TronClientError>;

    /// Broadcast a signed transaction.
    async fn send_raw_transaction(
        &self,
        signed: &Transaction,
    ) -> Result<BroadcastResult, TronClientError>;

    /// Height of the current head block.
    async fn get_now_block_number(&self) -> Result<u64, TronClientError>;
}

/// Account details returned by `getaccount`. Unknown accounts come back empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    #[serde(default)]
    pub address: Option<String>,
    /// Native balance in sun
    #[serde(default)]
    pub balance: u64,
    /// TRC-10 holdings keyed by asset id
    #[serde(default, rename = "assetV2")]
    pub asset_v2: Vec<AssetBalance>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetBalance {
    /// Asset id
    pub key: String,
    /// Balance in base units
    pub value: u64,
}

/// TRC-10 asset descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetIssue {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub abbr: String,
    #[serde(default)]
    pub precision: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmartContract {
    #[serde(default)]
    pub contract_address: String,
    #[serde(default)]
    pub name: String,
    /// On-chain ABI in the node's own format
    #[serde(default)]
    pub abi: Value,
}

/// Contract invocation parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    pub owner_address: String,
    pub contract_address: String,
    /// Canonical signature, e.g. `transfer(address,uint256)`
    pub function_selector: String,
    /// ABI-encoded arguments as hex, selector excluded
    pub parameter: String,
    pub fee_limit: u64,
    pub call_value: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerResponse {
    #[serde(default)]
    pub result: TriggerStatus,
    #[serde(default)]
    pub transaction: Option<Transaction>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerStatus {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResult {
    #[serde(default)]
    pub result: bool,
    #[serde(default)]
    pub txid: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A Tron transaction as exchanged with the node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub raw_data: RawData,
    #[serde(default)]
    pub raw_data_hex: String,
    /// Hex-encoded 65-byte signatures
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signature: Vec<String>,
    #[serde(default)]
    pub visible: bool,
}

impl Transaction {
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    #[serde(default)]
    pub contract: Vec<ContractEntry>,
    /// Reference block, expiration, timestamp, fee limit...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One contract (instruction) inside a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractEntry {
    pub parameter: ContractParameter,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractParameter {
    pub value: Map<String, Value>,
    #[serde(default)]
    pub type_url: String,
}

/// Errors that can occur talking to a Tron node.
#[derive(Debug, thiserror::Error)]
pub enum TronClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Contract not found: {0}")]
    ContractNotFound(String),

    #[error("Contract error: {0}")]
    ContractError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}
