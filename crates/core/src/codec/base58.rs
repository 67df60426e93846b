//! Base-58 with the Bitcoin alphabet.
//!
//! Arbitrary precision: the value is carried as a little-endian digit vector
//! so inputs of any length work. Leading zero bytes map to leading `'1'`s.

use super::CodecError;

const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Encode bytes as base-58.
pub fn base58_encode(bytes: &[u8]) -> String {
    let zeros = bytes.iter().take_while(|&&b| b == 0).count();

    // Base-58 digits, least significant first.
    let mut digits: Vec<u8> = Vec::with_capacity((bytes.len() - zeros) * 138 / 100 + 1);
    for &byte in &bytes[zeros..] {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut out = String::with_capacity(zeros + digits.len());
    out.extend(std::iter::repeat('1').take(zeros));
    out.extend(digits.iter().rev().map(|&d| ALPHABET[d as usize] as char));
    out
}

/// Decode a base-58 string.
///
/// Fails with [`CodecError::InvalidCharacter`] on the first character outside
/// the alphabet.
pub fn base58_decode(input: &str) -> Result<Vec<u8>, CodecError> {
    let mut zeros = 0usize;
    let mut leading = true;
    // Base-256 bytes, least significant first.
    let mut bytes: Vec<u8> = Vec::with_capacity(input.len() * 733 / 1000 + 1);

    for (position, character) in input.chars().enumerate() {
        let value = digit_value(character).ok_or(CodecError::InvalidCharacter {
            character,
            position,
        })?;

        if leading && value == 0 {
            zeros += 1;
            continue;
        }
        leading = false;

        let mut carry = value as u32;
        for byte in bytes.iter_mut() {
            carry += (*byte as u32) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut out = vec![0u8; zeros];
    out.extend(bytes.iter().rev());
    Ok(out)
}

fn digit_value(character: char) -> Option<u8> {
    if !character.is_ascii() {
        return None;
    }
    ALPHABET
        .iter()
        .position(|&a| a == character as u8)
        .map(|p| p as u8)
}
