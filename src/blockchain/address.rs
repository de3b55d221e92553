// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Tron address and key codec.
//!
//! A Tron address is 21 bytes: the `0x41` network prefix followed by the last
//! 20 bytes of the keccak-256 hash of the uncompressed public key (without the
//! `0x04` marker). Users see it as base58check (`T...`, 34 characters).

use std::fmt;
use std::str::FromStr;

use alloy::primitives::{keccak256, Address as EvmAddress};
use k256::{elliptic_curve::sec1::ToEncodedPoint, PublicKey, SecretKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const ADDRESS_PREFIX: u8 = 0x41;
pub const ADDRESS_BASE58_PREFIX: char = 'T';
pub const ADDRESS_BYTES_LEN: usize = 21;
pub const ADDRESS_HEX_LEN: usize = 42;
pub const ADDRESS_BASE58_LEN: usize = 34;
pub const PRIVATE_KEY_LEN: usize = 32;

/// Uncompressed SEC1 point marker.
const UNCOMPRESSED_MARKER: u8 = 0x04;
const COORDINATE_LEN: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// 21-byte Tron address.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TronAddress {
    inner: [u8; ADDRESS_BYTES_LEN],
}

impl TronAddress {
    /// Construct from a 20-byte EVM-style account id.
    pub fn from_evm(address: EvmAddress) -> Self {
        let mut inner = [0u8; ADDRESS_BYTES_LEN];
        inner[0] = ADDRESS_PREFIX;
        inner[1..].copy_from_slice(address.as_slice());
        Self { inner }
    }

    /// Derive the address of an uncompressed public key (`0x04 || x || y`).
    pub fn from_uncompressed_public_key(point: &[u8]) -> Result<Self, CodecError> {
        if point.len() != 1 + 2 * COORDINATE_LEN || point[0] != UNCOMPRESSED_MARKER {
            return Err(CodecError::InvalidPublicKey(
                "expected 65-byte uncompressed point".to_string(),
            ));
        }
        let hash = keccak256(&point[1..]);
        Ok(Self::from_evm(EvmAddress::from_slice(&hash[12..])))
    }

    pub fn from_base58(s: &str) -> Result<Self, CodecError> {
        let data = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|e| CodecError::InvalidAddress(format!("invalid base58check: {e}")))?;
        Self::from_slice(&data)
    }

    /// Construct from hex, with or without `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, CodecError> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let data = alloy::hex::decode(s)
            .map_err(|e| CodecError::InvalidAddress(format!("invalid hex: {e}")))?;
        Self::from_slice(&data)
    }

    fn from_slice(data: &[u8]) -> Result<Self, CodecError> {
        let inner: [u8; ADDRESS_BYTES_LEN] = data.try_into().map_err(|_| {
            CodecError::InvalidAddress(format!(
                "expected {ADDRESS_BYTES_LEN} bytes, got {}",
                data.len()
            ))
        })?;
        if inner[0] != ADDRESS_PREFIX {
            return Err(CodecError::InvalidAddress(format!(
                "expected prefix 0x{ADDRESS_PREFIX:x}"
            )));
        }
        Ok(Self { inner })
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.inner).with_check().into_string()
    }

    /// Lowercase hex including the `41` prefix.
    pub fn to_hex(&self) -> String {
        alloy::hex::encode(self.inner)
    }

    /// The 20-byte account id used inside ABI-encoded contract calls.
    pub fn to_evm(&self) -> EvmAddress {
        EvmAddress::from_slice(&self.inner[1..])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }
}

impl fmt::Display for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_base58())
    }
}

impl fmt::Debug for TronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TronAddress({} / {})", self.to_base58(), self.to_hex())
    }
}

impl FromStr for TronAddress {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == ADDRESS_BASE58_LEN && s.starts_with(ADDRESS_BASE58_PREFIX) {
            return Self::from_base58(s);
        }

        let hex = s.strip_prefix("0x").unwrap_or(s);
        if hex.len() == ADDRESS_HEX_LEN && hex.starts_with("41") {
            return Self::from_hex(hex);
        }

        Err(CodecError::InvalidAddress(format!(
            "'{s}' is neither base58 (34 chars starting with 'T') nor hex (42 chars starting with '41')"
        )))
    }
}

impl Serialize for TronAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base58())
    }
}

impl<'de> Deserialize<'de> for TronAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        TronAddress::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Whether `address` is a well-formed base58check Tron address.
pub fn is_address_valid(address: &str) -> bool {
    address.len() == ADDRESS_BASE58_LEN && TronAddress::from_base58(address).is_ok()
}

/// Raw private key bytes to lowercase hex.
pub fn private_key_to_hex(bytes: &[u8]) -> String {
    alloy::hex::encode(bytes)
}

/// Hex private key (optionally `0x` prefixed) to raw bytes.
pub fn hex_to_private_key(hex: &str) -> Result<Vec<u8>, CodecError> {
    let hex = hex.strip_prefix("0x").unwrap_or(hex);
    alloy::hex::decode(hex).map_err(|e| CodecError::InvalidPrivateKey(e.to_string()))
}

/// A valid key is exactly 32 bytes (64 hex characters) and a non-zero scalar
/// below the secp256k1 group order.
pub fn is_valid_private_key(hex: &str) -> bool {
    if hex.len() != 2 * PRIVATE_KEY_LEN {
        return false;
    }
    match hex_to_private_key(hex) {
        Ok(bytes) => SecretKey::from_slice(&bytes).is_ok(),
        Err(_) => false,
    }
}

/// Base58check address controlled by a raw private key.
pub fn private_key_to_address(bytes: &[u8]) -> Result<String, CodecError> {
    if bytes.len() != PRIVATE_KEY_LEN {
        return Err(CodecError::InvalidPrivateKey(format!(
            "expected {PRIVATE_KEY_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    let secret =
        SecretKey::from_slice(bytes).map_err(|e| CodecError::InvalidPrivateKey(e.to_string()))?;
    public_key_to_address(&secret.public_key())
}

/// Base58check address of a SEC1-encoded public key, compressed or not.
pub fn public_key_bytes_to_address(bytes: &[u8]) -> Result<String, CodecError> {
    let key =
        PublicKey::from_sec1_bytes(bytes).map_err(|e| CodecError::InvalidPublicKey(e.to_string()))?;
    public_key_to_address(&key)
}

fn public_key_to_address(key: &PublicKey) -> Result<String, CodecError> {
    let point = key.to_encoded_point(false);
    let (x, y) = match (point.x(), point.y()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(CodecError::InvalidPublicKey("point at infinity".to_string())),
    };

    let mut uncompressed = Vec::with_capacity(1 + 2 * COORDINATE_LEN);
    uncompressed.push(UNCOMPRESSED_MARKER);
    uncompressed.extend_from_slice(&pad_coordinate(x));
    uncompressed.extend_from_slice(&pad_coordinate(y));

    Ok(TronAddress::from_uncompressed_public_key(&uncompressed)?.to_base58())
}

/// Left-pad a big-endian coordinate to 32 bytes.
fn pad_coordinate(coordinate: &[u8]) -> [u8; COORDINATE_LEN] {
    let mut out = [0u8; COORDINATE_LEN];
    let len = coordinate.len().min(COORDINATE_LEN);
    out[COORDINATE_LEN - len..].copy_from_slice(&coordinate[coordinate.len() - len..]);
    out
}
