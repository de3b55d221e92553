// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction building and broadcasting for Tron.
//!
//! Each transfer is classified once and built along the matching path:
//! `createtransaction` for TRX, `transferasset` for TRC-10 and a
//! `triggersmartcontract` call to `transfer` for TRC-20. Signing and
//! broadcast follow only when an unsigned transaction was produced.

use std::str::FromStr;

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    json_abi::{Function, JsonAbi},
    primitives::{I256, U256},
};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::address::TronAddress;
use super::amount::{to_chain_units, AmountError};
use super::balance::DEFAULT_FEE_LIMIT_SUN;
use super::classify::AssetClass;
use super::client::{BroadcastResult, ContractCall, SmartContract, TronClient, TriggerResponse};
use super::signing::{AbiHints, SignStrategy, Signature, SignatureCoordinator, SigningPayload};
use super::trc20;
use super::types::{Account, Blockchain, Token};
use crate::error::{AdapterError, ErrorBody};

/// Contract method invoked for TRC-20 transfers.
pub const TRANSFER_METHOD: &str = "transfer";

/// A transfer as requested by the host.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub account: Account,
    /// Recipient, base58check
    pub to: String,
    /// Human-readable amount, e.g. `"1.5"`
    pub amount: String,
    pub token: Token,
    pub prompt_for_signature: bool,
}

/// An unsigned transaction ready for signing.
#[derive(Debug, Clone)]
pub struct UnsignedTransfer {
    pub class: AssetClass,
    pub payload: SigningPayload,
}

/// Result of the build stage.
#[derive(Debug)]
pub enum BuildOutcome {
    Ready(UnsignedTransfer),
    /// Nothing was built and there is nothing to report
    NoOp,
    Failed(AdapterError),
}

/// Broadcast transaction and the node's answer.
#[derive(Debug, Clone)]
pub struct Receipt {
    pub signature: Signature,
    pub broadcast: BroadcastResult,
}

#[derive(Debug)]
pub enum TransferOutcome {
    Sent(Receipt),
    Failed(AdapterError),
    /// The builder stopped on purpose
    Skipped,
}

impl TransferOutcome {
    /// `{error}` object for failed transfers.
    pub fn error_body(&self) -> Option<ErrorBody> {
        match self {
            TransferOutcome::Failed(e) => Some(e.to_body()),
            _ => None,
        }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, TransferOutcome::Sent(_))
    }
}

/// Builds unsigned transfers and drives them through signing and broadcast.
pub struct TransactionBuilder {
    native: Token,
    fee_limit: u64,
}

impl Default for TransactionBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FEE_LIMIT_SUN)
    }
}

impl TransactionBuilder {
    pub fn new(fee_limit: u64) -> Self {
        Self {
            native: Token::trx(),
            fee_limit,
        }
    }

    pub fn classify(&self, token: &Token) -> AssetClass {
        AssetClass::of(token, &self.native)
    }

    /// Build the unsigned transaction for `request`.
    ///
    /// Amount errors and failed TRX/TRC-10 builds are returned as
    /// [`BuildOutcome::Failed`]. Tokens of other chains and any TRC-20 build
    /// problem stop with [`BuildOutcome::NoOp`].
    pub async fn build(&self, client: &dyn TronClient, request: &TransferRequest) -> BuildOutcome {
        let token = &request.token;
        if token.blockchain != Blockchain::Trx {
            warn!(token = %token.symbol, blockchain = %token.blockchain, "Token is not a Tron asset");
            return BuildOutcome::NoOp;
        }

        let units = match to_chain_units(&request.amount, token.decimals) {
            Ok(units) => units,
            Err(e) => return BuildOutcome::Failed(e.into()),
        };

        let class = self.classify(token);
        let from = request.account.sendable();

        let built = match class {
            AssetClass::Native => match u64_units(units) {
                Ok(amount) => client.send_trx(&request.to, amount, from).await,
                Err(e) => return BuildOutcome::Failed(e.into()),
            },
            AssetClass::FirstClassToken => {
                let token_id = token.key.as_deref().unwrap_or(&token.symbol);
                match u64_units(units) {
                    Ok(amount) => client.send_token(&request.to, amount, token_id, from).await,
                    Err(e) => return BuildOutcome::Failed(e.into()),
                }
            }
            AssetClass::ContractToken => {
                return match self.build_contract_transfer(client, request, units).await {
                    Some(payload) => BuildOutcome::Ready(UnsignedTransfer { class, payload }),
                    None => BuildOutcome::NoOp,
                };
            }
        };

        match built {
            Ok(transaction) => BuildOutcome::Ready(UnsignedTransfer {
                class,
                payload: SigningPayload::new(transaction, &request.account),
            }),
            Err(e) => {
                error!(token = %token.symbol, class = class.label(), error = %e, "Failed to build transfer");
                BuildOutcome::Failed(e.into())
            }
        }
    }

    /// Build a TRC-20 `transfer` call, logging and returning `None` on any
    /// failure.
    async fn build_contract_transfer(
        &self,
        client: &dyn TronClient,
        request: &TransferRequest,
        units: U256,
    ) -> Option<SigningPayload> {
        let token = &request.token;

        let contract = match client.get_contract(&token.contract).await {
            Ok(contract) => contract,
            Err(e) => {
                error!(contract = %token.contract, error = %e, "Could not load token contract");
                return None;
            }
        };

        let abi = contract_abi(&contract);
        let Some(method) = trc20::find_method(&abi, TRANSFER_METHOD) else {
            error!(contract = %token.contract, "Contract ABI has no transfer method");
            return None;
        };

        let parameter = match encode_transfer_arguments(method, &request.to, units) {
            Ok(parameter) => parameter,
            Err(e) => {
                error!(contract = %token.contract, error = %e, "Could not encode transfer arguments");
                return None;
            }
        };

        let call = ContractCall {
            owner_address: request.account.sendable().to_string(),
            contract_address: token.contract.clone(),
            function_selector: method.signature(),
            parameter,
            fee_limit: self.fee_limit,
            call_value: 0,
        };

        let transaction = match client.trigger_smart_contract(&call).await {
            Ok(TriggerResponse {
                transaction: Some(transaction),
                ..
            }) => transaction,
            Ok(response) => {
                error!(
                    contract = %token.contract,
                    code = response.result.code.as_deref().unwrap_or_default(),
                    message = response.result.message.as_deref().unwrap_or_default(),
                    "Contract call produced no transaction"
                );
                return None;
            }
            Err(e) => {
                error!(contract = %token.contract, error = %e, "Contract call failed");
                return None;
            }
        };

        let hints = AbiHints {
            abi,
            method: TRANSFER_METHOD.to_string(),
            token: Some(token.clone()),
        };
        Some(SigningPayload::new(transaction, &request.account).with_abi(hints))
    }

    /// Build, sign and broadcast a transfer.
    ///
    /// # Returns
    /// * `Ok(TransferOutcome)` - Sent, failed before or after signing, or skipped
    /// * `Err(AdapterError)` - Interactive signing did not produce a signature
    pub async fn transfer(
        &self,
        client: &dyn TronClient,
        coordinator: &SignatureCoordinator,
        request: TransferRequest,
    ) -> Result<TransferOutcome, AdapterError> {
        let unsigned = match self.build(client, &request).await {
            BuildOutcome::Ready(unsigned) => unsigned,
            BuildOutcome::NoOp => {
                warn!(token = %request.token.symbol, "No transaction built, nothing to send");
                return Ok(TransferOutcome::Skipped);
            }
            BuildOutcome::Failed(e) => return Ok(TransferOutcome::Failed(e)),
        };

        let strategy = SignStrategy::from_prompt(request.prompt_for_signature);
        self.submit(client, coordinator, unsigned.payload, &request.account, strategy)
            .await
    }

    /// Sign `payload` with `strategy` and broadcast it.
    pub async fn submit(
        &self,
        client: &dyn TronClient,
        coordinator: &SignatureCoordinator,
        payload: SigningPayload,
        account: &Account,
        strategy: SignStrategy,
    ) -> Result<TransferOutcome, AdapterError> {
        let signature = match strategy {
            SignStrategy::Direct => match coordinator.sign_direct(&payload, account).await {
                Ok(signature) => signature,
                Err(e) => {
                    warn!(account = %account.public_key, error = %e, "Signing failed");
                    return Ok(TransferOutcome::Failed(e.into()));
                }
            },
            SignStrategy::Interactive => coordinator.sign_with_approval(payload, account).await?,
        };

        match client.send_raw_transaction(signature.transaction()).await {
            Ok(broadcast) if broadcast.result => {
                info!(tx_id = %signature.tx_id(), "Transaction broadcast");
                Ok(TransferOutcome::Sent(Receipt {
                    signature,
                    broadcast,
                }))
            }
            Ok(broadcast) => {
                error!(
                    tx_id = %signature.tx_id(),
                    code = broadcast.code.as_deref().unwrap_or_default(),
                    message = broadcast.message.as_deref().unwrap_or_default(),
                    "Broadcast rejected"
                );
                Ok(TransferOutcome::Failed(AdapterError::SendFailed))
            }
            Err(e) => {
                error!(tx_id = %signature.tx_id(), error = %e, "Broadcast failed");
                Ok(TransferOutcome::Failed(AdapterError::SendFailed))
            }
        }
    }
}

fn u64_units(units: U256) -> Result<u64, AmountError> {
    u64::try_from(units).map_err(|_| AmountError::Overflow)
}

/// The contract's on-chain ABI, or the standard TRC-20 ABI when the node
/// returns none.
pub fn contract_abi(contract: &SmartContract) -> JsonAbi {
    match node_abi(&contract.abi) {
        Some(abi) if !abi.functions.is_empty() => abi,
        _ => trc20::abi().clone(),
    }
}

/// Convert a node ABI (`{"entrys": [{"type": "Function", ...}]}`) to a
/// [`JsonAbi`]. Only functions are kept.
pub fn node_abi(abi: &Value) -> Option<JsonAbi> {
    let entries = abi.get("entrys")?.as_array()?;

    let functions: Vec<Value> = entries
        .iter()
        .filter_map(Value::as_object)
        .filter(|entry| {
            entry
                .get("type")
                .and_then(Value::as_str)
                .map_or(true, |kind| kind.eq_ignore_ascii_case("function"))
        })
        .map(|entry| {
            let mut function = Map::new();
            function.insert("type".to_string(), Value::from("function"));
            function.insert(
                "name".to_string(),
                entry.get("name").cloned().unwrap_or_else(|| Value::from("")),
            );
            for field in ["inputs", "outputs"] {
                let params = entry
                    .get(field)
                    .and_then(Value::as_array)
                    .map(|params| params.iter().map(node_param).collect())
                    .unwrap_or_default();
                function.insert(field.to_string(), Value::Array(params));
            }
            let mutability = entry
                .get("stateMutability")
                .and_then(Value::as_str)
                .unwrap_or("nonpayable")
                .to_ascii_lowercase();
            function.insert("stateMutability".to_string(), Value::from(mutability));
            Value::Object(function)
        })
        .collect();

    serde_json::from_value(Value::Array(functions)).ok()
}

fn node_param(param: &Value) -> Value {
    let mut cleaned = Map::new();
    cleaned.insert(
        "name".to_string(),
        param.get("name").cloned().unwrap_or_else(|| Value::from("")),
    );
    cleaned.insert(
        "type".to_string(),
        param.get("type").cloned().unwrap_or_else(|| Value::from("")),
    );
    Value::Object(cleaned)
}

/// ABI-encode `transfer` arguments: `address` inputs get the recipient, every
/// other input gets the amount.
///
/// Returns the hex parameter string, selector excluded.
pub fn encode_transfer_arguments(method: &Function, to: &str, amount: U256) -> Result<String, String> {
    let recipient = TronAddress::from_str(to).map_err(|e| e.to_string())?;

    let values = method
        .inputs
        .iter()
        .map(|param| {
            if param.ty == "address" {
                return Ok(DynSolValue::Address(recipient.to_evm()));
            }
            match DynSolType::parse(&param.ty) {
                Ok(DynSolType::Uint(bits)) => Ok(DynSolValue::Uint(amount, bits)),
                Ok(DynSolType::Int(bits)) => I256::try_from(amount)
                    .map(|value| DynSolValue::Int(value, bits))
                    .map_err(|e| e.to_string()),
                Ok(_) => Err(format!("cannot pass an amount as `{}`", param.ty)),
                Err(e) => Err(e.to_string()),
            }
        })
        .collect::<Result<Vec<_>, String>>()?;

    Ok(alloy::hex::encode(DynSolValue::Tuple(values).abi_encode_params()))
}
