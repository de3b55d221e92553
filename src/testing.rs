// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory fakes of the adapter's collaborators.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::{keccak256, U256};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::blockchain::address::TronAddress;
use crate::blockchain::cache::ClientFactory;
use crate::blockchain::client::{
    AccountInfo, AssetIssue, BroadcastResult, ContractCall, SmartContract, Transaction,
    TriggerResponse, TriggerStatus, TronClient, TronClientError,
};
use crate::blockchain::signing::{
    ApprovalChannel, ApprovalRequest, ApprovalResponse, HardwareSigner, SignError, Signature,
    Signer, SigningPayload,
};
use crate::blockchain::trc20::{self, ITRC20};
use crate::blockchain::types::{Account, Network};

/// Build a transaction holding one contract entry, with a txID that matches
/// its raw data.
pub fn transaction_with(kind: &str, value: Value) -> Transaction {
    let raw = serde_json::to_vec(&json!({ "type": kind, "value": value })).unwrap();
    let tx_id = alloy::hex::encode(Sha256::digest(&raw));
    serde_json::from_value(json!({
        "txID": tx_id,
        "visible": true,
        "raw_data": {
            "contract": [{
                "parameter": {
                    "value": value,
                    "type_url": format!("type.googleapis.com/protocol.{kind}"),
                },
                "type": kind,
            }],
            "expiration": 1700000060000u64,
            "timestamp": 1700000000000u64,
        },
        "raw_data_hex": alloy::hex::encode(&raw),
    }))
    .unwrap()
}

pub fn trx_transfer_transaction(from: &str, to: &str, amount: u64) -> Transaction {
    transaction_with(
        "TransferContract",
        json!({ "amount": amount, "owner_address": from, "to_address": to }),
    )
}

pub fn token_transfer_transaction(from: &str, to: &str, amount: u64, asset: &str) -> Transaction {
    transaction_with(
        "TransferAssetContract",
        json!({
            "amount": amount,
            "asset_name": asset,
            "owner_address": from,
            "to_address": to,
        }),
    )
}

pub fn trigger_transaction(
    owner: &str,
    contract: &str,
    data: &str,
    call_value: Option<u64>,
) -> Transaction {
    let mut value = json!({
        "data": data,
        "owner_address": owner,
        "contract_address": contract,
    });
    if let Some(call_value) = call_value {
        value["call_value"] = json!(call_value);
    }
    transaction_with("TriggerSmartContract", value)
}

/// Hex call data of a TRC-20 `transfer`, selector included.
pub fn transfer_call_data(to: &str, amount: u64) -> String {
    let call = ITRC20::transferCall {
        to: TronAddress::from_str(to).unwrap().to_evm(),
        value: U256::from(amount),
    };
    alloy::hex::encode(call.abi_encode())
}

/// A deployed contract whose node ABI is the TRC-20 interface in the node's
/// own `entrys` format.
pub fn trc20_contract(address: &str) -> SmartContract {
    let entries: Vec<Value> = serde_json::from_str::<Vec<Value>>(trc20::TRC20_ABI_JSON)
        .unwrap()
        .into_iter()
        .map(|mut entry| {
            let kind = entry["type"].as_str().unwrap_or_default().to_string();
            let mut chars = kind.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => kind.clone(),
            };
            entry["type"] = json!(capitalized);
            if let Some(mutability) = entry.get("stateMutability").and_then(Value::as_str) {
                let mutability = match mutability {
                    "view" => "View",
                    "nonpayable" => "Nonpayable",
                    other => other,
                }
                .to_string();
                entry["stateMutability"] = json!(mutability);
            }
            entry
        })
        .collect();

    SmartContract {
        contract_address: address.to_string(),
        name: "TetherToken".to_string(),
        abi: json!({ "entrys": entries }),
    }
}

/// A `send_trx` / `send_token` call seen by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentInstruction {
    pub to: String,
    pub amount: u64,
    pub token_id: Option<String>,
    pub from: String,
}

#[derive(Default)]
struct MockState {
    balance: u64,
    account: AccountInfo,
    account_delay: Option<Duration>,
    account_error: Option<String>,
    tokens: HashMap<String, AssetIssue>,
    contracts: HashMap<String, SmartContract>,
    contract_error: Option<String>,
    constant_results: HashMap<String, Result<Vec<Vec<u8>>, String>>,
    build_error: Option<String>,
    trigger_response: Option<TriggerResponse>,
    trigger_error: Option<String>,
    broadcast: Option<BroadcastResult>,
    broadcast_error: Option<String>,
    sends: Vec<SentInstruction>,
    trigger_calls: Vec<ContractCall>,
    constant_calls: Vec<ContractCall>,
    broadcasts: Vec<Transaction>,
    block_number: u64,
}

/// Configurable ledger client. Clones share state.
#[derive(Clone, Default)]
pub struct MockTronClient {
    state: Arc<Mutex<MockState>>,
}

impl MockTronClient {
    fn with_state<R>(&self, f: impl FnOnce(&mut MockState) -> R) -> R {
        f(&mut self.state.lock().unwrap())
    }

    pub fn set_balance(&self, sun: u64) {
        self.with_state(|s| s.balance = sun);
    }

    pub fn set_account(&self, account: AccountInfo) {
        self.with_state(|s| s.account = account);
    }

    pub fn set_account_delay(&self, delay: Duration) {
        self.with_state(|s| s.account_delay = Some(delay));
    }

    pub fn fail_account(&self, message: &str) {
        self.with_state(|s| s.account_error = Some(message.to_string()));
    }

    pub fn add_token(&self, id: &str, issue: AssetIssue) {
        self.with_state(|s| s.tokens.insert(id.to_string(), issue));
    }

    pub fn add_contract(&self, contract: SmartContract) {
        self.with_state(|s| s.contracts.insert(contract.contract_address.clone(), contract));
    }

    pub fn fail_contract_lookup(&self, message: &str) {
        self.with_state(|s| s.contract_error = Some(message.to_string()));
    }

    pub fn set_constant_result(&self, contract: &str, result: Result<Vec<Vec<u8>>, String>) {
        self.with_state(|s| s.constant_results.insert(contract.to_string(), result));
    }

    pub fn fail_builds(&self, message: &str) {
        self.with_state(|s| s.build_error = Some(message.to_string()));
    }

    pub fn set_trigger_response(&self, response: TriggerResponse) {
        self.with_state(|s| s.trigger_response = Some(response));
    }

    pub fn fail_trigger(&self, message: &str) {
        self.with_state(|s| s.trigger_error = Some(message.to_string()));
    }

    pub fn set_broadcast(&self, result: BroadcastResult) {
        self.with_state(|s| s.broadcast = Some(result));
    }

    pub fn fail_broadcast(&self, message: &str) {
        self.with_state(|s| s.broadcast_error = Some(message.to_string()));
    }

    pub fn set_block_number(&self, number: u64) {
        self.with_state(|s| s.block_number = number);
    }

    pub fn sends(&self) -> Vec<SentInstruction> {
        self.with_state(|s| s.sends.clone())
    }

    pub fn trigger_calls(&self) -> Vec<ContractCall> {
        self.with_state(|s| s.trigger_calls.clone())
    }

    pub fn constant_calls(&self) -> Vec<ContractCall> {
        self.with_state(|s| s.constant_calls.clone())
    }

    pub fn broadcasts(&self) -> Vec<Transaction> {
        self.with_state(|s| s.broadcasts.clone())
    }
}

#[async_trait]
impl TronClient for MockTronClient {
    async fn get_balance(&self, _address: &str) -> Result<u64, TronClientError> {
        Ok(self.with_state(|s| s.balance))
    }

    async fn get_account(&self, _address: &str) -> Result<AccountInfo, TronClientError> {
        let delay = self.with_state(|s| s.account_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.with_state(|s| match &s.account_error {
            Some(message) => Err(TronClientError::Request(message.clone())),
            None => Ok(s.account.clone()),
        })
    }

    async fn get_token_by_id(&self, id: &str) -> Result<AssetIssue, TronClientError> {
        self.with_state(|s| s.tokens.get(id).cloned())
            .ok_or_else(|| TronClientError::Rpc(format!("token {id} not found")))
    }

    async fn get_contract(&self, address: &str) -> Result<SmartContract, TronClientError> {
        self.with_state(|s| {
            if let Some(message) = &s.contract_error {
                return Err(TronClientError::Request(message.clone()));
            }
            s.contracts
                .get(address)
                .cloned()
                .ok_or_else(|| TronClientError::ContractNotFound(address.to_string()))
        })
    }

    async fn send_trx(&self, to: &str, amount: u64, from: &str) -> Result<Transaction, TronClientError> {
        self.with_state(|s| {
            if let Some(message) = &s.build_error {
                return Err(TronClientError::Rpc(message.clone()));
            }
            s.sends.push(SentInstruction {
                to: to.to_string(),
                amount,
                token_id: None,
                from: from.to_string(),
            });
            Ok(trx_transfer_transaction(from, to, amount))
        })
    }

    async fn send_token(
        &self,
        to: &str,
        amount: u64,
        token_id: &str,
        from: &str,
    ) -> Result<Transaction, TronClientError> {
        self.with_state(|s| {
            if let Some(message) = &s.build_error {
                return Err(TronClientError::Rpc(message.clone()));
            }
            s.sends.push(SentInstruction {
                to: to.to_string(),
                amount,
                token_id: Some(token_id.to_string()),
                from: from.to_string(),
            });
            Ok(token_transfer_transaction(from, to, amount, token_id))
        })
    }

    async fn trigger_smart_contract(
        &self,
        call: &ContractCall,
    ) -> Result<TriggerResponse, TronClientError> {
        self.with_state(|s| {
            s.trigger_calls.push(call.clone());
            if let Some(message) = &s.trigger_error {
                return Err(TronClientError::Rpc(message.clone()));
            }
            if let Some(response) = &s.trigger_response {
                return Ok(response.clone());
            }
            let hash = keccak256(call.function_selector.as_bytes());
            let data = format!("{}{}", alloy::hex::encode(&hash[..4]), call.parameter);
            let call_value = (call.call_value > 0).then_some(call.call_value);
            Ok(TriggerResponse {
                result: TriggerStatus {
                    result: true,
                    code: None,
                    message: None,
                },
                transaction: Some(trigger_transaction(
                    &call.owner_address,
                    &call.contract_address,
                    &data,
                    call_value,
                )),
            })
        })
    }

    async fn trigger_constant_contract(
        &self,
        call: &ContractCall,
    ) -> Result<Vec<Vec<u8>>, TronClientError> {
        self.with_state(|s| {
            s.constant_calls.push(call.clone());
            match s.constant_results.get(&call.contract_address) {
                Some(Ok(words)) => Ok(words.clone()),
                Some(Err(message)) => Err(TronClientError::ContractError(message.clone())),
                None => Err(TronClientError::ContractError("no contract".to_string())),
            }
        })
    }

    async fn send_raw_transaction(
        &self,
        signed: &Transaction,
    ) -> Result<BroadcastResult, TronClientError> {
        self.with_state(|s| {
            s.broadcasts.push(signed.clone());
            if let Some(message) = &s.broadcast_error {
                return Err(TronClientError::Request(message.clone()));
            }
            Ok(s.broadcast.clone().unwrap_or_else(|| BroadcastResult {
                result: true,
                txid: Some(signed.tx_id.clone()),
                code: None,
                message: None,
            }))
        })
    }

    async fn get_now_block_number(&self) -> Result<u64, TronClientError> {
        let delay = self.with_state(|s| s.account_delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.with_state(|s| match &s.account_error {
            Some(message) => Err(TronClientError::Request(message.clone())),
            None => Ok(s.block_number),
        })
    }
}

/// Factory handing out a fresh `Arc` per connect, all sharing one mock.
pub struct CountingFactory {
    client: MockTronClient,
    created: AtomicUsize,
}

impl CountingFactory {
    pub fn new(client: MockTronClient) -> Self {
        Self {
            client,
            created: AtomicUsize::new(0),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ClientFactory for CountingFactory {
    fn connect(&self, _network: &Network) -> Arc<dyn TronClient> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Arc::new(self.client.clone())
    }
}

fn mock_signed(payload: &SigningPayload, marker: &str) -> Signature {
    let mut signed = payload.transaction.clone();
    signed.signature.push(alloy::hex::encode(marker));
    Signature(signed)
}

/// Software signer that appends a marker signature.
#[derive(Default)]
pub struct MockSigner {
    calls: AtomicUsize,
    fail: bool,
}

impl MockSigner {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Signer for MockSigner {
    async fn sign(
        &self,
        _network: &Network,
        payload: &SigningPayload,
        public_key: &str,
        _arbitrary: bool,
        _is_hash: bool,
    ) -> Result<Signature, SignError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SignError::MissingKey(public_key.to_string()));
        }
        Ok(mock_signed(payload, "software"))
    }
}

#[derive(Default)]
pub struct MockHardwareSigner {
    calls: AtomicUsize,
}

impl MockHardwareSigner {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HardwareSigner for MockHardwareSigner {
    async fn sign(&self, _account: &Account, payload: &SigningPayload) -> Result<Signature, SignError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(mock_signed(payload, "hardware"))
    }
}

/// Approval channel answering every request with a fixed response.
pub struct MockApprovalChannel {
    response: ApprovalResponse,
    delay: Option<Duration>,
    requests: Mutex<Vec<(String, ApprovalRequest)>>,
}

impl MockApprovalChannel {
    pub fn new(response: ApprovalResponse) -> Self {
        Self {
            response,
            delay: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<(String, ApprovalRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ApprovalChannel for MockApprovalChannel {
    async fn emit(&self, event: &str, request: &ApprovalRequest) -> Result<ApprovalResponse, SignError> {
        self.requests
            .lock()
            .unwrap()
            .push((event.to_string(), request.clone()));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self.response.clone())
    }
}
