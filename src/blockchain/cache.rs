// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Per-network ledger client cache.
//!
//! Holds at most one client per `Network::unique()` key. Entries are never
//! evicted; only [`ClientCache::bust`] removes them, all at once. Callers that
//! already hold a client keep using it after a bust.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, warn};

use super::client::TronClient;
use super::http::{HttpTronClient, DEFAULT_HTTP_TIMEOUT};
use super::types::Network;

/// Builds a ledger client for a network. Must not fail.
pub trait ClientFactory: Send + Sync {
    fn connect(&self, network: &Network) -> Arc<dyn TronClient>;
}

/// Default factory producing [`HttpTronClient`]s bound to `network.fullhost()`.
#[derive(Debug, Clone)]
pub struct HttpClientFactory {
    timeout: Duration,
}

impl HttpClientFactory {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpClientFactory {
    fn default() -> Self {
        Self::new(DEFAULT_HTTP_TIMEOUT)
    }
}

impl ClientFactory for HttpClientFactory {
    fn connect(&self, network: &Network) -> Arc<dyn TronClient> {
        let full_host = network.fullhost();
        let client = HttpTronClient::connect(&full_host, self.timeout).unwrap_or_else(|e| {
            warn!(network = %network.unique(), host = %full_host, error = %e, "Unparseable node host, using it as is");
            HttpTronClient::new(full_host.as_str(), self.timeout)
        });
        Arc::new(client)
    }
}

/// Memoized ledger clients keyed by network identifier.
pub struct ClientCache {
    factory: Arc<dyn ClientFactory>,
    clients: RwLock<HashMap<String, Arc<dyn TronClient>>>,
}

impl ClientCache {
    pub fn new(factory: Arc<dyn ClientFactory>) -> Self {
        Self {
            factory,
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Get the client for `network`, creating and storing it on a miss.
    pub fn get(&self, network: &Network) -> Arc<dyn TronClient> {
        let key = network.unique();

        if let Some(client) = self
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Arc::clone(client);
        }

        // Built outside the lock; a racing insert for the same key wins and
        // the spare client is dropped.
        let client = self.factory.connect(network);
        debug!(network = %key, host = %network.fullhost(), "Created ledger client");

        let mut clients = self.clients.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(clients.entry(key).or_insert(client))
    }

    /// Drop every cached client.
    pub fn bust(&self) {
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ClientCache {
    fn default() -> Self {
        Self::new(Arc::new(HttpClientFactory::default()))
    }
}
