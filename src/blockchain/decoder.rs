// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Decoding of pending transactions into approval summaries.
//!
//! Every contract entry of a transaction becomes one [`DecodedCall`]. Without
//! ABI hints the raw parameter value is shown as-is; with hints the call data
//! is decoded against the hinted method and numbers, addresses and bytes are
//! rendered as plain strings.

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    json_abi::Function,
    primitives::U256,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::address::TronAddress;
use super::amount::from_chain_units;
use super::client::{ContractEntry, Transaction};
use super::signing::{AbiHints, SigningPayload};
use super::types::TRX_DECIMALS;

/// Target shown for contract entries that are not smart-contract calls.
pub const SYSTEM_TARGET: &str = "system";

/// Method name shown when no ABI method was matched.
pub const DEFAULT_METHOD: &str = "transfer";

/// Length of the function selector prefixing call data.
const SELECTOR_LEN: usize = 4;

/// One contract invocation, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedCall {
    /// Decoded parameters (or the raw parameter value without hints)
    pub data: Map<String, Value>,
    /// Contract address, or [`SYSTEM_TARGET`]
    pub code: String,
    /// Method name
    #[serde(rename = "type")]
    pub method: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("No method signature on the abi you provided matched the data for this transaction (method `{0}`)")]
    NoAbiMethod(String),

    #[error("Invalid call data: {0}")]
    InvalidCallData(String),
}

impl DecodeError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::NoAbiMethod(_) => "no_abi_method",
            DecodeError::InvalidCallData(_) => "invalid_call_data",
        }
    }
}

/// Stateless decoder; native amounts are labelled with `native_symbol`.
#[derive(Debug, Clone)]
pub struct RequestDecoder {
    native_symbol: String,
    native_decimals: u8,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new("TRX", TRX_DECIMALS)
    }
}

impl RequestDecoder {
    pub fn new(native_symbol: impl Into<String>, native_decimals: u8) -> Self {
        Self {
            native_symbol: native_symbol.into(),
            native_decimals,
        }
    }

    /// Decode a signing payload, using `hints` or else the payload's own ABI.
    pub fn decode_payload(
        &self,
        payload: &SigningPayload,
        hints: Option<&AbiHints>,
    ) -> Result<Vec<DecodedCall>, DecodeError> {
        let hints = hints.or(payload.abi.as_ref());
        self.decode(&payload.transaction, hints)
    }

    pub fn decode(
        &self,
        transaction: &Transaction,
        hints: Option<&AbiHints>,
    ) -> Result<Vec<DecodedCall>, DecodeError> {
        transaction
            .raw_data
            .contract
            .iter()
            .map(|entry| self.decode_entry(entry, hints))
            .collect()
    }

    fn decode_entry(
        &self,
        entry: &ContractEntry,
        hints: Option<&AbiHints>,
    ) -> Result<DecodedCall, DecodeError> {
        let value = &entry.parameter.value;

        let code = value
            .get("contract_address")
            .map(value_as_string)
            .unwrap_or_else(|| SYSTEM_TARGET.to_string());

        let paying = value.get("call_value").map(|call_value| {
            let sun = value_as_u256(call_value).unwrap_or(U256::ZERO);
            format!(
                "{} {}",
                from_chain_units(sun, self.native_decimals),
                self.native_symbol
            )
        });

        let Some(hints) = hints else {
            return Ok(DecodedCall {
                data: value.clone(),
                code,
                method: DEFAULT_METHOD.to_string(),
            });
        };

        let call_data = value
            .get("data")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::InvalidCallData("missing call data".to_string()))?;
        let call_data = alloy::hex::decode(call_data.trim_start_matches("0x"))
            .map_err(|e| DecodeError::InvalidCallData(e.to_string()))?;
        if call_data.len() < SELECTOR_LEN {
            return Err(DecodeError::InvalidCallData("call data shorter than a selector".to_string()));
        }
        let (selector, arguments) = call_data.split_at(SELECTOR_LEN);

        let method = matching_method(hints, selector)
            .ok_or_else(|| DecodeError::NoAbiMethod(hints.method.clone()))?;

        let decoded = method
            .abi_decode_input(arguments)
            .map_err(|e| DecodeError::InvalidCallData(e.to_string()))?;

        let mut data = Map::new();
        let mut amount_field = None;
        for (index, (param, value)) in method.inputs.iter().zip(decoded.iter()).enumerate() {
            let name = if param.name.is_empty() {
                index.to_string()
            } else {
                param.name.clone()
            };
            if amount_field.is_none() && matches!(value, DynSolValue::Uint(..)) {
                amount_field = Some(name.clone());
            }
            data.insert(name, display_value(value));
        }

        if let Some(paying) = paying {
            data.insert("paying".to_string(), Value::String(paying));
        }

        if let Some(token) = &hints.token {
            data.insert("token".to_string(), Value::String(token.symbol.clone()));

            let field = if data.contains_key("value") {
                Some("value".to_string())
            } else {
                amount_field
            };
            if let Some(field) = field {
                if let Some(raw) = data.get(&field).and_then(value_as_u256) {
                    data.insert(field, Value::String(from_chain_units(raw, token.decimals)));
                }
            }
        }

        Ok(DecodedCall {
            data,
            code,
            method: method.name.clone(),
        })
    }
}

/// The overload of the hinted method whose selector heads the call data.
fn matching_method<'a>(hints: &'a AbiHints, selector: &[u8]) -> Option<&'a Function> {
    hints
        .abi
        .function(&hints.method)?
        .iter()
        .find(|function| function.selector().as_slice() == selector)
}

/// Render an ABI value for display. Numbers become decimal strings,
/// addresses base58check, bytes `0x` hex.
pub fn display_value(value: &DynSolValue) -> Value {
    match value {
        DynSolValue::Address(address) => {
            Value::String(TronAddress::from_evm(*address).to_base58())
        }
        DynSolValue::Bool(b) => Value::Bool(*b),
        DynSolValue::Uint(n, _) => Value::String(n.to_string()),
        DynSolValue::Int(n, _) => Value::String(n.to_string()),
        DynSolValue::String(s) => Value::String(s.clone()),
        DynSolValue::Bytes(bytes) => Value::String(format!("0x{}", alloy::hex::encode(bytes))),
        DynSolValue::FixedBytes(word, size) => {
            Value::String(format!("0x{}", alloy::hex::encode(&word[..*size])))
        }
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) | DynSolValue::Tuple(items) => {
            Value::Array(items.iter().map(display_value).collect())
        }
        other => Value::String(format!("{other:?}")),
    }
}

fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn value_as_u256(value: &Value) -> Option<U256> {
    match value {
        Value::Number(n) => n.as_u64().map(U256::from),
        Value::String(s) => U256::from_str_radix(s, 10).ok(),
        _ => None,
    }
}
