//! Identifier and link codec.
//!
//! Pure functions for the identifiers that appear in torrent records:
//! base-58 (contract and document ids), SHA-256 based contract-id derivation,
//! BitTorrent v1 info hashes, magnet URIs, tracker lists and typed ids
//! (IMDB, OpenLibrary works). Nothing in here holds state.

mod base58;
mod hash;
mod info_hash;
mod magnet;
mod trackers;
mod typed_id;

pub use base58::{base58_decode, base58_encode};
pub use hash::{derive_contract_id, double_sha256, sha256};
pub use info_hash::{bytes_to_hex, hex_to_bytes, InfoHash, INFO_HASH_LEN};
pub use magnet::{build_magnet_uri, parse_magnet_link, InfoHashRef, MagnetLink};
pub use trackers::{parse_tracker_list, Trackers, TRACKER_SCHEMES};
pub use typed_id::{format_typed_id, parse_typed_id, IdFormat, TYPED_ID_MAX};

use thiserror::Error;

/// Errors produced by the strict codec conversions.
///
/// Magnet and tracker-list parsing never return these; they degrade to
/// partial results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Invalid character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("Invalid length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid info hash: {0}")]
    InvalidInfoHash(String),
}

/// Decode `hex` into exactly `out.len()` bytes.
pub(crate) fn decode_hex_exact(hex: &str, out: &mut [u8]) -> Result<(), CodecError> {
    let expected = out.len() * 2;
    if hex.len() != expected {
        return Err(CodecError::InvalidLength {
            expected,
            actual: hex.len(),
        });
    }
    hex::decode_to_slice(hex, out).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { c, index } => CodecError::InvalidCharacter {
            character: c,
            position: index,
        },
        _ => CodecError::InvalidLength {
            expected,
            actual: hex.len(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_exact() {
        let mut out = [0u8; 2];
        decode_hex_exact("aBff", &mut out).unwrap();
        assert_eq!(out, [0xab, 0xff]);

        assert_eq!(
            decode_hex_exact("abc", &mut out),
            Err(CodecError::InvalidLength {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            decode_hex_exact("ab0g", &mut out),
            Err(CodecError::InvalidCharacter {
                character: 'g',
                position: 3
            })
        );
    }
}
