// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! TronGrid HTTP wallet API client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::client::{
    AccountInfo, AssetIssue, BroadcastResult, ContractCall, SmartContract, Transaction,
    TriggerResponse, TriggerStatus, TronClient, TronClientError,
};

/// Default request timeout for node calls.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Tron full-node client speaking the `/wallet/*` HTTP API.
///
/// All requests use `visible: true`, so addresses go over the wire as
/// base58check strings.
#[derive(Debug, Clone)]
pub struct HttpTronClient {
    full_host: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct ConstantResponse {
    #[serde(default)]
    constant_result: Vec<String>,
    #[serde(default)]
    result: Option<TriggerStatus>,
    #[serde(default)]
    transaction: Option<ConstantTransaction>,
}

#[derive(Debug, Default, Deserialize)]
struct ConstantTransaction {
    #[serde(default)]
    ret: Vec<ContractRet>,
}

#[derive(Debug, Deserialize)]
struct ContractRet {
    #[serde(default)]
    ret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NowBlock {
    block_header: BlockHeader,
}

#[derive(Debug, Deserialize)]
struct BlockHeader {
    raw_data: BlockRawData,
}

#[derive(Debug, Deserialize)]
struct BlockRawData {
    #[serde(default)]
    number: u64,
}

impl HttpTronClient {
    /// Create a client bound to `full_host`.
    ///
    /// Falls back to a default HTTP client if a tuned one cannot be built, so
    /// construction never fails.
    pub fn new(full_host: impl Into<String>, timeout: Duration) -> Self {
        let full_host = full_host.into().trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { full_host, http }
    }

    /// Create a client after checking `full_host` parses as a URL.
    pub fn connect(full_host: &str, timeout: Duration) -> Result<Self, TronClientError> {
        url::Url::parse(full_host).map_err(|e| TronClientError::InvalidRpcUrl(e.to_string()))?;
        Ok(Self::new(full_host, timeout))
    }

    pub fn full_host(&self) -> &str {
        &self.full_host
    }

    async fn post_value(&self, path: &str, body: &Value) -> Result<Value, TronClientError> {
        let url = format!("{}/{}", self.full_host, path.trim_start_matches('/'));
        debug!(%url, "Tron node request");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| TronClientError::Request(format!("{path}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TronClientError::Request(format!("{path}: HTTP {status}")));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| TronClientError::InvalidResponse(format!("{path}: {e}")))?;

        check_node_error(value)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, TronClientError> {
        let value = self.post_value(path, &body).await?;
        from_value(path, value)
    }

    async fn build_transaction(&self, path: &str, body: Value) -> Result<Transaction, TronClientError> {
        let value = self.post_value(path, &body).await?;
        interpret_transaction(path, value)
    }

    fn call_body(call: &ContractCall) -> Value {
        json!({
            "owner_address": call.owner_address,
            "contract_address": call.contract_address,
            "function_selector": call.function_selector,
            "parameter": call.parameter,
            "fee_limit": call.fee_limit,
            "call_value": call.call_value,
            "visible": true,
        })
    }
}

#[async_trait]
impl TronClient for HttpTronClient {
    async fn get_balance(&self, address: &str) -> Result<u64, TronClientError> {
        Ok(self.get_account(address).await?.balance)
    }

    async fn get_account(&self, address: &str) -> Result<AccountInfo, TronClientError> {
        self.post("wallet/getaccount", json!({ "address": address, "visible": true }))
            .await
    }

    async fn get_token_by_id(&self, id: &str) -> Result<AssetIssue, TronClientError> {
        let value = self
            .post_value("wallet/getassetissuebyid", &json!({ "value": id }))
            .await?;
        interpret_asset(id, value)
    }

    async fn get_contract(&self, address: &str) -> Result<SmartContract, TronClientError> {
        let value = self
            .post_value("wallet/getcontract", &json!({ "value": address, "visible": true }))
            .await?;
        interpret_contract(address, value)
    }

    async fn send_trx(&self, to: &str, amount: u64, from: &str) -> Result<Transaction, TronClientError> {
        self.build_transaction(
            "wallet/createtransaction",
            json!({
                "to_address": to,
                "owner_address": from,
                "amount": amount,
                "visible": true,
            }),
        )
        .await
    }

    async fn send_token(
        &self,
        to: &str,
        amount: u64,
        token_id: &str,
        from: &str,
    ) -> Result<Transaction, TronClientError> {
        self.build_transaction(
            "wallet/transferasset",
            json!({
                "to_address": to,
                "owner_address": from,
                "asset_name": token_id,
                "amount": amount,
                "visible": true,
            }),
        )
        .await
    }

    async fn trigger_smart_contract(
        &self,
        call: &ContractCall,
    ) -> Result<TriggerResponse, TronClientError> {
        self.post("wallet/triggersmartcontract", Self::call_body(call))
            .await
    }

    async fn trigger_constant_contract(
        &self,
        call: &ContractCall,
    ) -> Result<Vec<Vec<u8>>, TronClientError> {
        let value = self
            .post_value("wallet/triggerconstantcontract", &Self::call_body(call))
            .await?;
        interpret_constant(value)
    }

    async fn send_raw_transaction(
        &self,
        signed: &Transaction,
    ) -> Result<BroadcastResult, TronClientError> {
        let body = serde_json::to_value(signed)
            .map_err(|e| TronClientError::InvalidResponse(e.to_string()))?;
        let mut result: BroadcastResult = self.post("wallet/broadcasttransaction", body).await?;
        result.message = result.message.as_deref().map(decode_hex_text);
        Ok(result)
    }

    async fn get_now_block_number(&self) -> Result<u64, TronClientError> {
        let block: NowBlock = self.post("wallet/getnowblock", json!({})).await?;
        Ok(block.block_header.raw_data.number)
    }
}

/// A body carrying an `Error` field is a node-side failure.
fn check_node_error(value: Value) -> Result<Value, TronClientError> {
    if let Some(error) = value.get("Error").and_then(Value::as_str) {
        return Err(TronClientError::Rpc(error.to_string()));
    }
    Ok(value)
}

fn from_value<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, TronClientError> {
    serde_json::from_value(value).map_err(|e| TronClientError::InvalidResponse(format!("{path}: {e}")))
}

/// Build endpoints answer a refused transfer without a `txID`.
fn interpret_transaction(path: &str, value: Value) -> Result<Transaction, TronClientError> {
    if value.get("txID").is_none() {
        let reason = value
            .get("result")
            .and_then(|r| r.get("message"))
            .and_then(Value::as_str)
            .map(decode_hex_text)
            .unwrap_or_else(|| "no transaction returned".to_string());
        return Err(TronClientError::Rpc(format!("{path}: {reason}")));
    }
    from_value(path, value)
}

fn interpret_asset(id: &str, value: Value) -> Result<AssetIssue, TronClientError> {
    let mut asset: AssetIssue = from_value("wallet/getassetissuebyid", value)?;
    if asset.id.is_empty() && asset.name.is_empty() {
        return Err(TronClientError::Rpc(format!("token {id} not found")));
    }
    asset.name = decode_hex_text(&asset.name);
    asset.abbr = decode_hex_text(&asset.abbr);
    Ok(asset)
}

/// Unknown addresses come back as `{}`.
fn interpret_contract(address: &str, value: Value) -> Result<SmartContract, TronClientError> {
    if value.as_object().is_none_or(|o| o.is_empty()) {
        return Err(TronClientError::ContractNotFound(address.to_string()));
    }
    from_value("wallet/getcontract", value)
}

/// Result words of a read-only call. A failed status or a `REVERT` in the
/// simulated transaction is a contract error.
fn interpret_constant(value: Value) -> Result<Vec<Vec<u8>>, TronClientError> {
    let response: ConstantResponse = from_value("wallet/triggerconstantcontract", value)?;
    let failed = response.result.as_ref().is_some_and(|status| !status.result);
    let message = response
        .result
        .as_ref()
        .and_then(|status| status.message.as_deref())
        .map(decode_hex_text);

    if let (true, Some(message)) = (failed, message.as_ref()) {
        return Err(TronClientError::ContractError(message.clone()));
    }

    let reverted = response
        .transaction
        .as_ref()
        .and_then(|tx| tx.ret.first())
        .and_then(|ret| ret.ret.as_deref())
        .is_some_and(|ret| ret.eq_ignore_ascii_case("REVERT"));
    if reverted {
        return Err(TronClientError::ContractError(
            message.unwrap_or_else(|| "REVERT".to_string()),
        ));
    }

    response
        .constant_result
        .iter()
        .map(|word| {
            alloy::hex::decode(word).map_err(|e| TronClientError::InvalidResponse(e.to_string()))
        })
        .collect()
}

/// Nodes hex-encode asset names and error messages; decode when it is valid
/// hex of UTF-8 text, otherwise keep the original.
fn decode_hex_text(value: &str) -> String {
    if value.is_empty() || value.len() % 2 != 0 {
        return value.to_string();
    }
    alloy::hex::decode(value)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDT: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

    #[test]
    fn decode_hex_text_handles_plain_and_hex() {
        assert_eq!(decode_hex_text("426974546f7272656e74"), "BitTorrent");
        assert_eq!(decode_hex_text("BTT"), "BTT");
        assert_eq!(decode_hex_text(""), "");
        // valid hex but not UTF-8
        assert_eq!(decode_hex_text("ff"), "ff");
    }

    #[test]
    fn connect_rejects_bad_url() {
        assert!(matches!(
            HttpTronClient::connect("not a url", DEFAULT_HTTP_TIMEOUT),
            Err(TronClientError::InvalidRpcUrl(_))
        ));
        let client = HttpTronClient::connect("https://api.trongrid.io:443/", DEFAULT_HTTP_TIMEOUT).unwrap();
        assert_eq!(client.full_host(), "https://api.trongrid.io:443");
    }

    #[test]
    fn error_field_is_an_rpc_error() {
        let err = check_node_error(json!({ "Error": "class org.tron.core.exception.BadItemException" }))
            .unwrap_err();
        assert!(matches!(err, TronClientError::Rpc(m) if m.contains("BadItemException")));

        let ok = check_node_error(json!({ "balance": 1 })).unwrap();
        assert_eq!(ok["balance"], 1);
    }

    #[test]
    fn empty_contract_body_is_not_found() {
        let err = interpret_contract(USDT, json!({})).unwrap_err();
        assert!(matches!(err, TronClientError::ContractNotFound(a) if a == USDT));

        let contract = interpret_contract(
            USDT,
            json!({
                "contract_address": USDT,
                "name": "TetherToken",
                "abi": { "entrys": [] },
            }),
        )
        .unwrap();
        assert_eq!(contract.name, "TetherToken");
    }

    #[test]
    fn build_response_without_tx_id_is_rejected() {
        let refused = json!({
            "result": {
                "code": "CONTRACT_VALIDATE_ERROR",
                // "balance is not sufficient."
                "message": "62616c616e6365206973206e6f742073756666696369656e742e",
            }
        });
        let err = interpret_transaction("wallet/createtransaction", refused).unwrap_err();
        assert!(matches!(err, TronClientError::Rpc(m) if m.contains("balance is not sufficient")));

        let err = interpret_transaction("wallet/transferasset", json!({})).unwrap_err();
        assert!(matches!(err, TronClientError::Rpc(m) if m.contains("no transaction returned")));
    }

    #[test]
    fn build_response_with_tx_id_parses() {
        let tx = interpret_transaction(
            "wallet/createtransaction",
            json!({
                "txID": "ab",
                "raw_data": { "contract": [], "expiration": 1 },
                "raw_data_hex": "0a02",
                "visible": true,
            }),
        )
        .unwrap();
        assert_eq!(tx.tx_id, "ab");
        assert_eq!(tx.raw_data.extra["expiration"], 1);
    }

    #[test]
    fn asset_names_are_decoded() {
        let asset = interpret_asset(
            "1002000",
            json!({
                "id": "1002000",
                "name": "426974546f7272656e74",
                "abbr": "425454",
                "precision": 6,
            }),
        )
        .unwrap();
        assert_eq!(asset.name, "BitTorrent");
        assert_eq!(asset.abbr, "BTT");
        assert_eq!(asset.precision, 6);

        assert!(matches!(
            interpret_asset("9", json!({})),
            Err(TronClientError::Rpc(_))
        ));
    }

    #[test]
    fn constant_call_failures_are_contract_errors() {
        let failed = json!({
            "result": { "result": false, "code": "CONTRACT_EXE_ERROR", "message": "524556455254" },
        });
        let err = interpret_constant(failed).unwrap_err();
        assert!(matches!(err, TronClientError::ContractError(m) if m == "REVERT"));

        let reverted = json!({
            "result": { "result": true },
            "constant_result": ["08c379a0"],
            "transaction": { "ret": [{ "ret": "REVERT" }] },
        });
        assert!(matches!(
            interpret_constant(reverted),
            Err(TronClientError::ContractError(_))
        ));
    }

    #[test]
    fn constant_call_returns_decoded_words() {
        let word = format!("{}2a", "0".repeat(62));
        let words = interpret_constant(json!({
            "result": { "result": true },
            "constant_result": [word],
            "transaction": { "ret": [{}] },
        }))
        .unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].len(), 32);
        assert_eq!(words[0][31], 0x2a);
    }

    #[test]
    fn call_body_uses_visible_addresses() {
        let call = ContractCall {
            owner_address: "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL".to_string(),
            contract_address: "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t".to_string(),
            function_selector: "balanceOf(address)".to_string(),
            parameter: "00".to_string(),
            fee_limit: 1,
            call_value: 0,
        };
        let body = HttpTronClient::call_body(&call);
        assert_eq!(body["visible"], true);
        assert_eq!(body["function_selector"], "balanceOf(address)");
    }
}
