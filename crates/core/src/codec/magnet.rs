//! Magnet URI parsing and building.
//!
//! Only the fields records carry are modeled: the v1 info hash (`xt` with
//! `urn:btih:`), the display name (`dn`) and trackers (`tr`). Other
//! parameters are ignored on parse and never emitted.

use serde::Serialize;
use tracing::debug;

use super::{CodecError, InfoHash, Trackers, INFO_HASH_LEN};

const MAGNET_PREFIX: &str = "magnet:?";
const BTIH_PREFIX: &str = "urn:btih:";
const BASE32_HASH_LEN: usize = 32;
const HEX_HASH_LEN: usize = 40;

/// Fields extracted from a magnet URI.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MagnetLink {
    /// Lowercase hex info hash.
    pub info_hash: Option<String>,
    pub display_name: Option<String>,
    pub trackers: Trackers,
}

/// Parse a magnet URI.
///
/// Never fails. Malformed input, including a link without a usable `btih`
/// topic, yields an empty [`MagnetLink`]; a `tr` parameter that does not
/// decode is skipped on its own.
pub fn parse_magnet_link(uri: &str) -> MagnetLink {
    let mut link = MagnetLink::default();

    let uri = uri.trim();
    let query = match uri.get(..MAGNET_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(MAGNET_PREFIX) => &uri[MAGNET_PREFIX.len()..],
        _ => return link,
    };

    let mut tracker_urls = Vec::new();
    for param in query.split('&') {
        let (key, value) = match param.split_once('=') {
            Some(kv) => kv,
            None => continue,
        };

        match key {
            "xt" if link.info_hash.is_none() => {
                link.info_hash = btih_from_exact_topic(value);
            }
            "dn" if link.display_name.is_none() => {
                let value = value.replace('+', " ");
                match urlencoding::decode(&value) {
                    Ok(name) => link.display_name = Some(name.into_owned()),
                    Err(e) => debug!(error = %e, "Skipping undecodable magnet display name"),
                }
            }
            "tr" => match urlencoding::decode(value) {
                Ok(url) => tracker_urls.push(url.into_owned()),
                Err(e) => debug!(error = %e, "Skipping undecodable magnet tracker"),
            },
            _ => {}
        }
    }

    if link.info_hash.is_none() {
        debug!("Magnet link has no usable btih topic");
        return MagnetLink::default();
    }

    link.trackers = tracker_urls.iter().collect();
    link
}

/// The info hash in either accepted representation.
#[derive(Debug, Clone, Copy)]
pub enum InfoHashRef<'a> {
    Raw(&'a [u8]),
    Hex(&'a str),
}

impl<'a> From<&'a [u8]> for InfoHashRef<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        InfoHashRef::Raw(bytes)
    }
}

impl<'a> From<&'a [u8; INFO_HASH_LEN]> for InfoHashRef<'a> {
    fn from(bytes: &'a [u8; INFO_HASH_LEN]) -> Self {
        InfoHashRef::Raw(bytes)
    }
}

impl<'a> From<&'a str> for InfoHashRef<'a> {
    fn from(hex: &'a str) -> Self {
        InfoHashRef::Hex(hex)
    }
}

impl<'a> From<&'a InfoHash> for InfoHashRef<'a> {
    fn from(hash: &'a InfoHash) -> Self {
        InfoHashRef::Raw(hash.as_bytes())
    }
}

impl InfoHashRef<'_> {
    fn resolve(self) -> Result<InfoHash, CodecError> {
        match self {
            InfoHashRef::Raw(bytes) => InfoHash::from_slice(bytes),
            InfoHashRef::Hex(hex) => InfoHash::from_hex(hex.trim()),
        }
        .map_err(|e| CodecError::InvalidInfoHash(e.to_string()))
    }
}

/// Build a magnet URI from an info hash, optional display name and trackers.
///
/// Fails with [`CodecError::InvalidInfoHash`] when the hash is neither 20
/// raw bytes nor 40 hex characters.
pub fn build_magnet_uri<'a>(
    info_hash: impl Into<InfoHashRef<'a>>,
    display_name: Option<&str>,
    trackers: &Trackers,
) -> Result<String, CodecError> {
    let hash = info_hash.into().resolve()?;
    Ok(hash.magnet_uri(display_name, trackers))
}

impl InfoHash {
    /// Magnet URI for this hash.
    pub fn magnet_uri(&self, display_name: Option<&str>, trackers: &Trackers) -> String {
        let mut uri = format!("{}xt={}{}", MAGNET_PREFIX, BTIH_PREFIX, self.to_hex());
        if let Some(name) = display_name.filter(|n| !n.is_empty()) {
            uri.push_str("&dn=");
            uri.push_str(&urlencoding::encode(name));
        }
        for tracker in trackers.iter() {
            uri.push_str("&tr=");
            uri.push_str(&urlencoding::encode(tracker));
        }
        uri
    }
}

/// Extract a hex v1 hash from an `xt` value, if it is a btih topic.
fn btih_from_exact_topic(value: &str) -> Option<String> {
    let hash = match value.get(..BTIH_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(BTIH_PREFIX) => &value[BTIH_PREFIX.len()..],
        _ => return None,
    };

    match hash.len() {
        HEX_HASH_LEN if hash.chars().all(|c| c.is_ascii_hexdigit()) => Some(hash.to_ascii_lowercase()),
        BASE32_HASH_LEN => base32_to_hex(hash),
        _ => None,
    }
}

/// RFC 4648 base-32 to lowercase hex, 5 bits per symbol, leftover bits that
/// do not fill a nibble dropped.
fn base32_to_hex(input: &str) -> Option<String> {
    const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

    let mut out = String::with_capacity(input.len() * 5 / 4);
    let mut buffer: u32 = 0;
    let mut bits: u32 = 0;

    for c in input.chars() {
        let value = match c.to_ascii_uppercase() {
            u @ 'A'..='Z' => u as u32 - 'A' as u32,
            d @ '2'..='7' => d as u32 - '2' as u32 + 26,
            _ => return None,
        };
        buffer = (buffer << 5) | value;
        bits += 5;
        while bits >= 4 {
            bits -= 4;
            out.push(HEX_DIGITS[((buffer >> bits) & 0xf) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }

    Some(out)
}
