//! Binding the client to the data contract that holds the torrent collections.

use thiserror::Error;
use tracing::{info, warn};

use crate::codec::{derive_contract_id, CodecError};
use crate::config::ContractConfig;
use crate::metrics;
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Contract not found: {0}")]
    NotFound(String),

    #[error("No contract configured: set contract.id or contract.owner_id and contract.entropy")]
    NotConfigured,

    #[error("Invalid contract configuration: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A contract confirmed to exist in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundContract {
    /// The id queries and submissions go to.
    pub id: String,
    pub owner_id: String,
    /// Locally derived id, when owner and entropy were configured.
    pub derived_id: Option<String>,
}

/// Pick between a locally derived contract id and the one the store knows.
///
/// The store's value always wins; a mismatch is logged and counted.
pub fn reconcile_contract_id(derived: &str, assigned: &str) -> String {
    if derived != assigned {
        warn!(
            derived = %derived,
            assigned = %assigned,
            "Derived contract id differs from store-assigned id, using store value"
        );
        metrics::CONTRACT_ID_MISMATCHES.inc();
    }
    assigned.to_string()
}

/// Resolve the configured contract and confirm it exists in `store`.
pub async fn bind_contract(
    store: &dyn DocumentStore,
    config: &ContractConfig,
) -> Result<BoundContract, ContractError> {
    let derived_id = match derive_configured_id(config) {
        Ok(derived) => derived,
        // A configured id makes derivation a cross-check only
        Err(e) if config.id.is_some() => {
            warn!(error = %e, "Could not derive contract id, using configured id");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let requested = match (config.id.as_deref(), derived_id.as_deref()) {
        (Some(configured), Some(derived)) => reconcile_contract_id(derived, configured),
        (Some(configured), None) => configured.to_string(),
        (None, Some(derived)) => derived.to_string(),
        (None, None) => return Err(ContractError::NotConfigured),
    };

    let contract = store
        .fetch_contract(&requested)
        .await?
        .ok_or_else(|| ContractError::NotFound(requested.clone()))?;

    let id = reconcile_contract_id(&requested, &contract.id);

    info!(
        store = store.name(),
        contract_id = %id,
        owner_id = %contract.owner_id,
        "Bound data contract"
    );

    Ok(BoundContract {
        id,
        owner_id: contract.owner_id,
        derived_id,
    })
}

fn derive_configured_id(config: &ContractConfig) -> Result<Option<String>, CodecError> {
    match (config.owner_id.as_deref(), config.entropy_bytes()?) {
        (Some(owner_id), Some(entropy)) => derive_contract_id(owner_id, &entropy).map(Some),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fixtures, MockDocumentStore};

    const OWNER: &str = "4EfA9Jrvv3nnCFdSf7fad59851iiTRZ6Wcu6YVJ4iSeF";
    const DERIVED: &str = "4G82b52w5s9ADKB8MeUdiwu2UGXKUAHw9848khNc95Px";
    const ENTROPY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    fn derived_config() -> ContractConfig {
        ContractConfig {
            id: None,
            owner_id: Some(OWNER.to_string()),
            entropy: Some(ENTROPY.to_string()),
        }
    }

    #[test]
    fn test_reconcile_prefers_assigned() {
        assert_eq!(reconcile_contract_id("abc", "abc"), "abc");
        assert_eq!(reconcile_contract_id("abc", "xyz"), "xyz");
    }

    #[tokio::test]
    async fn test_bind_derived_contract() {
        let store = MockDocumentStore::new();
        store.add_contract(fixtures::contract(DERIVED)).await;

        let bound = bind_contract(&store, &derived_config()).await.unwrap();
        assert_eq!(bound.id, DERIVED);
        assert_eq!(bound.derived_id.as_deref(), Some(DERIVED));
    }

    #[tokio::test]
    async fn test_bind_prefers_configured_id_over_derived() {
        let assigned = "GfbYJ7kCXGxHwQZ5UWjN4Jnqj6SaWvszM7Y1cRaTCCRr";
        let store = MockDocumentStore::new();
        store.add_contract(fixtures::contract(assigned)).await;

        let config = ContractConfig {
            id: Some(assigned.to_string()),
            ..derived_config()
        };
        let bound = bind_contract(&store, &config).await.unwrap();
        assert_eq!(bound.id, assigned);
        assert_eq!(bound.derived_id.as_deref(), Some(DERIVED));
    }

    #[tokio::test]
    async fn test_bind_missing_contract() {
        let store = MockDocumentStore::new();
        let err = bind_contract(&store, &derived_config()).await.unwrap_err();
        assert!(matches!(err, ContractError::NotFound(id) if id == DERIVED));
    }

    #[tokio::test]
    async fn test_bind_requires_configuration() {
        let store = MockDocumentStore::new();
        let config = ContractConfig {
            owner_id: Some(OWNER.to_string()),
            ..Default::default()
        };
        let err = bind_contract(&store, &config).await.unwrap_err();
        assert!(matches!(err, ContractError::NotConfigured));
    }

    #[tokio::test]
    async fn test_bind_rejects_bad_owner() {
        let store = MockDocumentStore::new();
        let config = ContractConfig {
            owner_id: Some("not-base58!".to_string()),
            ..derived_config()
        };
        let err = bind_contract(&store, &config).await.unwrap_err();
        assert!(matches!(err, ContractError::Codec(_)));
    }

    #[tokio::test]
    async fn test_bind_configured_id_survives_bad_owner() {
        let store = MockDocumentStore::new();
        store.add_contract(fixtures::contract(DERIVED)).await;
        let config = ContractConfig {
            id: Some(DERIVED.to_string()),
            owner_id: Some("not-base58!".to_string()),
            entropy: Some(ENTROPY.to_string()),
        };

        let bound = bind_contract(&store, &config).await.unwrap();
        assert_eq!(bound.id, DERIVED);
        assert_eq!(bound.derived_id, None);
    }

    #[tokio::test]
    async fn test_bind_surfaces_store_errors() {
        let store = MockDocumentStore::new();
        store
            .set_next_error(StoreError::ConnectionError("unreachable".to_string()))
            .await;
        let config = ContractConfig {
            id: Some(DERIVED.to_string()),
            ..Default::default()
        };
        let err = bind_contract(&store, &config).await.unwrap_err();
        assert!(matches!(err, ContractError::Store(StoreError::ConnectionError(_))));
    }
}
