// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Balance aggregation.
//!
//! A single bad token never fails an aggregation: per-asset failures are
//! logged and reported as a zero amount.

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::U256;
use futures::future::join_all;
use tracing::warn;

use super::amount::{from_chain_units, to_fixed, zero_fixed};
use super::classify::AssetClass;
use super::client::{AccountInfo, AssetBalance, TronClient, TronClientError};
use super::trc20::Trc20Contract;
use super::types::{Account, Blockchain, Token, TRX_DECIMALS};

/// How long `balances_for` waits for the account lookup.
pub const DEFAULT_BALANCES_TIMEOUT: Duration = Duration::from_secs(2);

/// Fee limit for read-only contract calls, in sun.
pub const DEFAULT_FEE_LIMIT_SUN: u64 = 150_000_000;

pub struct BalanceAggregator {
    native: Token,
    timeout: Duration,
    fee_limit: u64,
}

impl Default for BalanceAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_BALANCES_TIMEOUT, DEFAULT_FEE_LIMIT_SUN)
    }
}

impl BalanceAggregator {
    pub fn new(timeout: Duration, fee_limit: u64) -> Self {
        Self {
            native: Token::trx(),
            timeout,
            fee_limit,
        }
    }

    pub fn native(&self) -> &Token {
        &self.native
    }

    /// Balance of one asset, returned as a copy of `token` with `amount` set.
    ///
    /// Only the native lookup can fail; contract lookups fall back to zero.
    pub async fn balance_for(
        &self,
        client: &dyn TronClient,
        account: &Account,
        token: &Token,
    ) -> Result<Token, TronClientError> {
        let mut balance = token.clone();

        if AssetClass::of(token, &self.native) == AssetClass::Native {
            let sun = client.get_balance(account.sendable()).await?;
            balance.amount = native_amount(sun);
            return Ok(balance);
        }

        if !token.has_contract() {
            warn!(token = %token.symbol, "Token has no contract to query, reporting zero");
            balance.amount = zero_fixed(token.decimals);
            return Ok(balance);
        }

        let contract = Trc20Contract::new(client, &token.contract, self.fee_limit);
        balance.amount = match contract.balance_of(account.sendable()).await {
            Ok(raw) => from_chain_units(raw, token.decimals),
            Err(e) => {
                warn!(
                    token = %token.symbol,
                    contract = %token.contract,
                    error = %e,
                    "Token balance lookup failed, reporting zero"
                );
                zero_fixed(token.decimals)
            }
        };
        Ok(balance)
    }

    /// Native balance, then the account's on-chain assets, then `tokens` in
    /// input order.
    pub async fn balances_for(
        &self,
        client: &Arc<dyn TronClient>,
        account: &Account,
        tokens: &[Token],
    ) -> Vec<Token> {
        let snapshot = self.account_snapshot(client, account).await;

        let mut balances = Vec::with_capacity(1 + snapshot.asset_v2.len() + tokens.len());
        balances.push(self.native.clone().with_amount(native_amount(snapshot.balance)));
        balances.extend(
            self.enumerated_assets(client.as_ref(), &account.network().chain_id, &snapshot.asset_v2)
                .await,
        );

        for token in tokens {
            let balance = match self.balance_for(client.as_ref(), account, token).await {
                Ok(balance) => balance,
                Err(e) => {
                    warn!(token = %token.symbol, error = %e, "Balance lookup failed, reporting zero");
                    token.clone().with_amount(zero_fixed(token.decimals))
                }
            };
            balances.push(balance);
        }

        balances
    }

    /// Account state, or an empty account if the lookup fails or does not
    /// finish in time. A late lookup keeps running detached and its result is
    /// dropped.
    async fn account_snapshot(&self, client: &Arc<dyn TronClient>, account: &Account) -> AccountInfo {
        let client = Arc::clone(client);
        let address = account.sendable().to_string();
        let lookup = tokio::spawn(async move { client.get_account(&address).await });

        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(Ok(info))) => info,
            Ok(Ok(Err(e))) => {
                warn!(account = %account.public_key, error = %e, "Account lookup failed, treating as empty");
                AccountInfo::default()
            }
            Ok(Err(e)) => {
                warn!(account = %account.public_key, error = %e, "Account lookup task failed, treating as empty");
                AccountInfo::default()
            }
            Err(_) => {
                warn!(
                    account = %account.public_key,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Account lookup timed out, treating as empty"
                );
                AccountInfo::default()
            }
        }
    }

    /// Resolve descriptors for the account's TRC-10 holdings, all at once.
    /// The tokens carry the account's chain id.
    async fn enumerated_assets(
        &self,
        client: &dyn TronClient,
        chain_id: &str,
        assets: &[AssetBalance],
    ) -> Vec<Token> {
        let lookups = assets.iter().map(|asset| async move {
            let (symbol, name) = match client.get_token_by_id(&asset.key).await {
                Ok(issue) => {
                    let symbol = if issue.abbr.is_empty() {
                        issue.name.clone()
                    } else {
                        issue.abbr
                    };
                    (symbol, issue.name)
                }
                Err(e) => {
                    warn!(asset = %asset.key, error = %e, "Asset descriptor lookup failed");
                    (asset.key.clone(), asset.key.clone())
                }
            };

            Token::new(Blockchain::Trx, "", symbol, name, TRX_DECIMALS, chain_id)
                .with_key(asset.key.clone())
                .with_amount(native_amount(asset.value))
        });

        join_all(lookups).await
    }
}

fn native_amount(sun: u64) -> String {
    to_fixed(U256::from(sun), TRX_DECIMALS, TRX_DECIMALS as usize)
}
