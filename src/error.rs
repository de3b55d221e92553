// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use serde::{Deserialize, Serialize};

use crate::blockchain::address::CodecError;
use crate::blockchain::amount::AmountError;
use crate::blockchain::client::TronClientError;
use crate::blockchain::decoder::DecodeError;
use crate::blockchain::signing::SignError;

/// Any failure surfaced by the adapter.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error(transparent)]
    Client(#[from] TronClientError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error(transparent)]
    Sign(#[from] SignError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Could not get signature")]
    SignatureUnavailable,

    #[error("Failed to send.")]
    SendFailed,
}

impl AdapterError {
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::new(self.to_string())
    }
}

/// `{error}` object handed back to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

impl From<&AdapterError> for ErrorBody {
    fn from(e: &AdapterError) -> Self {
        e.to_body()
    }
}
