//! Chain identifiers: 20-byte account/contract addresses and 32-byte transaction hashes

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crate::infrastructure::{Result, SwapError, ValidationError};

/// Account or contract address on an EVM network
///
/// Parsing is case-insensitive (checksummed and lowercase forms compare equal);
/// display is always lowercase `0x`-prefixed hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; 20]);

impl Address {
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn new(bytes: [u8; 20]) -> Self {
        Address(bytes)
    }

    /// Build an address from a `0x`-prefixed literal at compile time
    ///
    /// Only meant for `const` items: a malformed literal fails the build
    /// instead of surfacing at runtime.
    pub const fn from_hex_literal(literal: &str) -> Self {
        let bytes = literal.as_bytes();
        assert!(
            bytes.len() == 42 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X'),
            "address literal must be 0x followed by 40 hex digits"
        );

        let mut out = [0u8; 20];
        let mut i = 0;
        while i < 20 {
            out[i] = (hex_nibble(bytes[2 + 2 * i]) << 4) | hex_nibble(bytes[3 + 2 * i]);
            i += 1;
        }
        Address(out)
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = SwapError;

    fn from_str(text: &str) -> Result<Self> {
        decode_fixed::<20>(text, "address").map(Address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Transaction identifier returned by the submission channel
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TxHash([u8; 32]);

impl TxHash {
    pub const fn new(bytes: [u8; 32]) -> Self {
        TxHash(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for TxHash {
    type Err = SwapError;

    fn from_str(text: &str) -> Result<Self> {
        decode_fixed::<32>(text, "transaction hash").map(TxHash)
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", self)
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ===== Helper Functions =====

fn decode_fixed<const N: usize>(text: &str, what: &str) -> Result<[u8; N]> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .ok_or_else(|| invalid_hex(text, what, "missing 0x prefix".to_string()))?;

    let bytes = hex::decode(digits)
        .map_err(|e| invalid_hex(text, what, e.to_string()))?;

    <[u8; N]>::try_from(bytes.as_slice())
        .map_err(|_| invalid_hex(text, what, format!("expected {} bytes, got {}", N, bytes.len())))
}

fn invalid_hex(text: &str, what: &str, reason: String) -> SwapError {
    SwapError::Validation(ValidationError::InvalidHex {
        value: text.to_string(),
        kind: what.to_string(),
        reason,
    })
}

const fn hex_nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => panic!("invalid hex digit in address literal"),
    }
}
