//! Hash primitives and contract-id derivation.

use sha2::{Digest, Sha256};

use super::{base58_decode, base58_encode, CodecError};

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 applied twice.
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Derive a data-contract id from its owner and 32 bytes of entropy.
///
/// `base58(double_sha256(base58_decode(owner_id) ++ entropy))`. Any party
/// holding the same inputs derives the same id, which is what lets a client
/// cross-check the id a store assigns.
pub fn derive_contract_id(owner_id: &str, entropy: &[u8; 32]) -> Result<String, CodecError> {
    let mut preimage = base58_decode(owner_id)?;
    preimage.extend_from_slice(entropy);
    Ok(base58_encode(&double_sha256(&preimage)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: &str = "4EfA9Jrvv3nnCFdSf7fad59851iiTRZ6Wcu6YVJ4iSeF";

    fn entropy() -> [u8; 32] {
        let mut entropy = [0u8; 32];
        for (i, b) in entropy.iter_mut().enumerate() {
            *b = i as u8;
        }
        entropy
    }

    #[test]
    fn test_sha256_known_vectors() {
        assert_eq!(
            hex::encode(sha256(b"")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            hex::encode(sha256(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_double_sha256() {
        assert_eq!(
            hex::encode(double_sha256(b"")),
            "5df6e0e2761359d30a8275058e299fcc0381534545f55cf43e41983f5d4c9456"
        );
        assert_eq!(double_sha256(b"abc"), sha256(&sha256(b"abc")));
    }

    #[test]
    fn test_derive_contract_id_known_value() {
        let id = derive_contract_id(OWNER, &entropy()).unwrap();
        assert_eq!(id, "4G82b52w5s9ADKB8MeUdiwu2UGXKUAHw9848khNc95Px");
    }

    #[test]
    fn test_derive_contract_id_is_deterministic_and_entropy_sensitive() {
        let first = derive_contract_id(OWNER, &entropy()).unwrap();
        let second = derive_contract_id(OWNER, &entropy()).unwrap();
        assert_eq!(first, second);

        let mut other = entropy();
        other[31] ^= 1;
        assert_ne!(derive_contract_id(OWNER, &other).unwrap(), first);
    }

    #[test]
    fn test_derive_contract_id_rejects_bad_owner() {
        let result = derive_contract_id("not-base58!", &entropy());
        assert!(matches!(result, Err(CodecError::InvalidCharacter { .. })));
    }
}
