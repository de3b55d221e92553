// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TRC-20 token contract interactions.

use std::str::FromStr;
use std::sync::LazyLock;

use alloy::{
    dyn_abi::DynSolType,
    json_abi::{Function, JsonAbi},
    primitives::U256,
    sol,
    sol_types::SolCall,
};

use super::address::TronAddress;
use super::client::{ContractCall, TronClient, TronClientError};

// TRC-20 is ABI-compatible with ERC-20; addresses are encoded as their 20-byte
// account id.
sol! {
    interface ITRC20 {
        function name() external view returns (string);
        function symbol() external view returns (string);
        function decimals() external view returns (uint8);
        function totalSupply() external view returns (uint256);
        function balanceOf(address owner) external view returns (uint256);
        function transfer(address to, uint256 value) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 value) external returns (bool);
        function transferFrom(address from, address to, uint256 value) external returns (bool);
    }
}

/// JSON ABI of the TRC-20 interface, attached to transfers as decoding hints.
pub const TRC20_ABI_JSON: &str = r#"[
  {"type":"function","name":"name","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
  {"type":"function","name":"symbol","inputs":[],"outputs":[{"name":"","type":"string"}],"stateMutability":"view"},
  {"type":"function","name":"decimals","inputs":[],"outputs":[{"name":"","type":"uint8"}],"stateMutability":"view"},
  {"type":"function","name":"totalSupply","inputs":[],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"balanceOf","inputs":[{"name":"owner","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"transfer","inputs":[{"name":"to","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
  {"type":"function","name":"allowance","inputs":[{"name":"owner","type":"address"},{"name":"spender","type":"address"}],"outputs":[{"name":"","type":"uint256"}],"stateMutability":"view"},
  {"type":"function","name":"approve","inputs":[{"name":"spender","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
  {"type":"function","name":"transferFrom","inputs":[{"name":"from","type":"address"},{"name":"to","type":"address"},{"name":"value","type":"uint256"}],"outputs":[{"name":"","type":"bool"}],"stateMutability":"nonpayable"},
  {"type":"event","name":"Transfer","inputs":[{"name":"from","type":"address","indexed":true},{"name":"to","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}],"anonymous":false},
  {"type":"event","name":"Approval","inputs":[{"name":"owner","type":"address","indexed":true},{"name":"spender","type":"address","indexed":true},{"name":"value","type":"uint256","indexed":false}],"anonymous":false}
]"#;

static TRC20_ABI: LazyLock<JsonAbi> =
    LazyLock::new(|| serde_json::from_str(TRC20_ABI_JSON).unwrap_or_default());

/// The parsed TRC-20 ABI.
pub fn abi() -> &'static JsonAbi {
    &TRC20_ABI
}

/// First method named `name` in `abi`.
pub fn find_method<'a>(abi: &'a JsonAbi, name: &str) -> Option<&'a Function> {
    abi.function(name).and_then(|overloads| overloads.first())
}

/// TRC-20 contract handle over a ledger client.
pub struct Trc20Contract<'a> {
    client: &'a dyn TronClient,
    address: String,
    fee_limit: u64,
}

impl<'a> Trc20Contract<'a> {
    pub fn new(client: &'a dyn TronClient, contract_address: &str, fee_limit: u64) -> Self {
        Self {
            client,
            address: contract_address.to_string(),
            fee_limit,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Raw balance of `owner`, in the token's base units.
    pub async fn balance_of(&self, owner: &str) -> Result<U256, TronClientError> {
        let owner_address = TronAddress::from_str(owner)
            .map_err(|e| TronClientError::InvalidAddress(e.to_string()))?;

        let encoded = ITRC20::balanceOfCall {
            owner: owner_address.to_evm(),
        }
        .abi_encode();

        let call = ContractCall {
            owner_address: owner.to_string(),
            contract_address: self.address.clone(),
            function_selector: ITRC20::balanceOfCall::SIGNATURE.to_string(),
            parameter: alloy::hex::encode(&encoded[4..]),
            fee_limit: self.fee_limit,
            call_value: 0,
        };

        let words = self.client.trigger_constant_contract(&call).await?;
        decode_uint_word(&words)
    }
}

/// Decode the first result word as a `uint256`.
fn decode_uint_word(words: &[Vec<u8>]) -> Result<U256, TronClientError> {
    let word = words
        .first()
        .filter(|w| !w.is_empty())
        .ok_or_else(|| TronClientError::ContractError("empty constant result".to_string()))?;

    // A revert payload (`Error(string)`) is longer than one word.
    if word.len() != 32 {
        return Err(TronClientError::ContractError(format!(
            "result is {} bytes, expected a single uint256 word",
            word.len()
        )));
    }

    DynSolType::Uint(256)
        .abi_decode(word)
        .ok()
        .and_then(|value| value.as_uint().map(|(v, _)| v))
        .ok_or_else(|| TronClientError::ContractError("result is not a uint256".to_string()))
}
