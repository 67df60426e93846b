//! BitTorrent v1 info hashes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{decode_hex_exact, CodecError};

/// Length of a v1 info hash in bytes.
pub const INFO_HASH_LEN: usize = 20;

/// Convert 40 hex characters to the 20 raw hash bytes.
///
/// Upper and lower case are both accepted.
pub fn hex_to_bytes(hex: &str) -> Result<[u8; INFO_HASH_LEN], CodecError> {
    let mut out = [0u8; INFO_HASH_LEN];
    decode_hex_exact(hex, &mut out)?;
    Ok(out)
}

/// Convert 20 raw hash bytes to 40 lowercase hex characters.
pub fn bytes_to_hex(bytes: &[u8]) -> Result<String, CodecError> {
    if bytes.len() != INFO_HASH_LEN {
        return Err(CodecError::InvalidLength {
            expected: INFO_HASH_LEN,
            actual: bytes.len(),
        });
    }
    Ok(hex::encode(bytes))
}

/// A validated 20-byte info hash.
///
/// Displays and serializes as 40 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct InfoHash([u8; INFO_HASH_LEN]);

impl InfoHash {
    pub fn from_bytes(bytes: [u8; INFO_HASH_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, which must be exactly 20 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CodecError> {
        let array: [u8; INFO_HASH_LEN] =
            bytes.try_into().map_err(|_| CodecError::InvalidLength {
                expected: INFO_HASH_LEN,
                actual: bytes.len(),
            })?;
        Ok(Self(array))
    }

    pub fn from_hex(hex: &str) -> Result<Self, CodecError> {
        hex_to_bytes(hex).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; INFO_HASH_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for InfoHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InfoHash({})", self.to_hex())
    }
}

impl FromStr for InfoHash {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for InfoHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for InfoHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
