// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The Tron adapter handed to the wallet host.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::blockchain::address::{
    hex_to_private_key, is_address_valid, is_valid_private_key, private_key_to_address,
    private_key_to_hex, public_key_bytes_to_address, CodecError,
};
use crate::blockchain::balance::BalanceAggregator;
use crate::blockchain::cache::{ClientCache, ClientFactory, HttpClientFactory};
use crate::blockchain::client::TronClient;
use crate::blockchain::decoder::DecodedCall;
use crate::blockchain::signing::{
    pem_to_hex, ApprovalChannel, HardwareSigner, SignatureCoordinator, Signer, SigningPayload,
};
use crate::blockchain::transactions::{TransactionBuilder, TransferOutcome, TransferRequest};
use crate::blockchain::types::{
    self, Account, Blockchain, Explorer, Network, ReturnableAccount, Token, TRON_BIP_PATH,
    TRX_DECIMALS,
};
use crate::config::AdapterConfig;
use crate::error::AdapterError;

/// Placeholder shown in contract address inputs.
pub const CONTRACT_PLACEHOLDER: &str = "0x.....";

/// Tron blockchain adapter.
pub struct TronAdapter {
    config: AdapterConfig,
    cache: ClientCache,
    builder: TransactionBuilder,
    balances: BalanceAggregator,
    coordinator: SignatureCoordinator,
}

impl TronAdapter {
    /// Adapter over HTTP node clients.
    pub fn new(config: AdapterConfig, signer: Arc<dyn Signer>) -> Self {
        let factory = Arc::new(HttpClientFactory::new(config.http_timeout));
        Self::with_factory(config, signer, factory)
    }

    /// Adapter over clients produced by `factory`.
    pub fn with_factory(
        config: AdapterConfig,
        signer: Arc<dyn Signer>,
        factory: Arc<dyn ClientFactory>,
    ) -> Self {
        let coordinator = SignatureCoordinator::new(signer)
            .with_origin(config.approval_origin.clone())
            .with_approval_timeout(config.approval_timeout);

        Self {
            cache: ClientCache::new(factory),
            builder: TransactionBuilder::new(config.fee_limit_sun),
            balances: BalanceAggregator::new(config.balances_timeout, config.fee_limit_sun),
            coordinator,
            config,
        }
    }

    /// Route hardware accounts to `hardware`.
    pub fn with_hardware(mut self, hardware: Arc<dyn HardwareSigner>) -> Self {
        self.coordinator = self.coordinator.with_hardware(hardware);
        self
    }

    /// Enable interactive signing through `approvals`.
    pub fn with_approvals(mut self, approvals: Arc<dyn ApprovalChannel>) -> Self {
        self.coordinator = self.coordinator.with_approvals(approvals);
        self
    }

    /// Identity key reported in approval requests.
    pub fn with_identity_key(mut self, identity_key: impl Into<String>) -> Self {
        self.coordinator = self.coordinator.with_identity_key(identity_key);
        self
    }

    /// Settings this adapter was built with.
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Cancels every pending approval when triggered.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.coordinator.cancellation_token()
    }

    /// Cached ledger client for `network`.
    pub fn client(&self, network: &Network) -> Arc<dyn TronClient> {
        self.cache.get(network)
    }

    /// Drop every cached ledger client. The next call builds a new one.
    pub fn bust_cache(&self) {
        debug!(clients = self.cache.len(), "Flushing ledger client cache");
        self.cache.bust();
    }

    /// Balance of one asset held by `account`.
    ///
    /// # Arguments
    /// * `account` - Holder, whose network selects the ledger client
    /// * `token` - Asset to look up; TRX is read natively, anything else via `balanceOf`
    ///
    /// # Returns
    /// A copy of `token` with `amount` filled in. Only a failed native lookup
    /// is an error; contract lookups fall back to a zero amount.
    pub async fn balance_for(&self, account: &Account, token: &Token) -> Result<Token, AdapterError> {
        let client = self.client(account.network());
        Ok(self.balances.balance_for(client.as_ref(), account, token).await?)
    }

    /// Native balance, the account's TRC-10 holdings, then `tokens` in order.
    ///
    /// Never fails: an unreachable account reads as empty.
    pub async fn balances_for(&self, account: &Account, tokens: &[Token]) -> Vec<Token> {
        let client = self.client(account.network());
        self.balances.balances_for(&client, account, tokens).await
    }

    /// Build, sign and broadcast a transfer.
    ///
    /// # Returns
    /// * `Ok(TransferOutcome)` - Sent, soft failure, or skipped
    /// * `Err(AdapterError)` - Interactive signing was refused or could not be prepared
    pub async fn transfer(&self, request: TransferRequest) -> Result<TransferOutcome, AdapterError> {
        let client = self.client(request.account.network());
        self.builder
            .transfer(client.as_ref(), &self.coordinator, request)
            .await
    }

    /// Decode a pending signing payload for review.
    pub fn request_parser(&self, payload: &SigningPayload) -> Result<Vec<DecodedCall>, AdapterError> {
        Ok(self.coordinator.decoder().decode_payload(payload, None)?)
    }

    /// Current block of `network`, or `None` if it does not answer within
    /// the balances timeout.
    pub async fn check_network(&self, network: &Network) -> Option<u64> {
        let client = self.client(network);
        match tokio::time::timeout(self.config.balances_timeout, client.get_now_block_number()).await {
            Ok(Ok(block)) => Some(block),
            Ok(Err(e)) => {
                warn!(network = %network.unique(), error = %e, "Network check failed");
                None
            }
            Err(_) => {
                warn!(network = %network.unique(), "Network check timed out");
                None
            }
        }
    }

    /// BIP-44 derivation path for Tron keys.
    pub fn bip(&self) -> &'static str {
        TRON_BIP_PATH
    }

    /// Blockchain this adapter serves.
    pub fn blockchain(&self) -> Blockchain {
        Blockchain::Trx
    }

    /// Tronscan links for accounts, transactions and blocks.
    pub fn default_explorer(&self) -> Explorer {
        types::tronscan()
    }

    /// Tron Mainnet.
    pub fn endorsed_network(&self) -> Network {
        types::endorsed_network()
    }

    /// Whether `network` resolves to the same ledger as Mainnet.
    pub fn is_endorsed_network(&self, network: &Network) -> bool {
        network.unique() == types::endorsed_network().unique()
    }

    /// Numeric chain id of Mainnet.
    pub fn chain_id(&self) -> u64 {
        1
    }

    /// TRX decimals (sun per TRX is 10^6).
    pub fn default_decimals(&self) -> u8 {
        TRX_DECIMALS
    }

    /// The native TRX descriptor.
    pub fn default_token(&self) -> Token {
        Token::trx()
    }

    /// Example address shown in contract inputs.
    pub fn contract_placeholder(&self) -> &'static str {
        CONTRACT_PLACEHOLDER
    }

    /// Always `false`: no resource staking surface.
    pub fn uses_resources(&self) -> bool {
        false
    }

    /// Always `false`: no account-level actions.
    pub fn has_account_actions(&self) -> bool {
        false
    }

    /// Always `false`.
    pub fn accounts_are_imported(&self) -> bool {
        false
    }

    /// Always `false`.
    pub fn has_untouchable_tokens(&self) -> bool {
        false
    }

    /// Display form of an account: its base58check address.
    pub fn account_formatter(&self, account: &Account) -> String {
        account.public_key.clone()
    }

    /// Account shape handed back to hosts.
    pub fn returnable_account(&self, account: &Account) -> ReturnableAccount {
        ReturnableAccount {
            address: account.public_key.clone(),
            blockchain: Blockchain::Trx,
        }
    }

    /// Accounts that must approve `payload`.
    pub fn action_participants(&self, payload: &SigningPayload) -> Vec<Account> {
        payload.participants.clone()
    }

    /// Whether `address` is a valid base58check Tron address.
    pub fn is_valid_recipient(&self, address: &str) -> bool {
        is_address_valid(address)
    }

    /// Tron accounts are identified by address, so this checks the address.
    pub fn valid_public_key(&self, address: &str) -> bool {
        is_address_valid(address)
    }

    /// Whether `private_key` is 64 hex characters encoding a valid secp256k1 scalar.
    pub fn valid_private_key(&self, private_key: &str) -> bool {
        is_valid_private_key(private_key)
    }

    /// Address controlled by a hex private key.
    ///
    /// # Errors
    /// Returns `CodecError` if the key is not valid hex or not a valid scalar.
    pub fn private_to_public(&self, private_key: &str) -> Result<String, CodecError> {
        private_key_to_address(&hex_to_private_key(private_key)?)
    }

    /// Hex form of raw private key bytes.
    pub fn buffer_to_hex_private(&self, bytes: &[u8]) -> String {
        private_key_to_hex(bytes)
    }

    /// Raw bytes of a hex private key.
    pub fn hex_private_to_buffer(&self, private_key: &str) -> Result<Vec<u8>, CodecError> {
        hex_to_private_key(private_key)
    }

    /// Address of a SEC1 public key given as raw bytes.
    pub fn buffer_to_hex_public_key_or_address(&self, bytes: &[u8]) -> Result<String, CodecError> {
        public_key_bytes_to_address(bytes)
    }

    /// Hex private key from a stored PEM key.
    pub fn import_pem(&self, pem_bytes: &[u8]) -> Result<String, CodecError> {
        pem_to_hex(pem_bytes)
    }
}
