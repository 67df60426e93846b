use serde::{Deserialize, Serialize};

use crate::codec::{decode_hex_exact, CodecError};
use crate::schema::{CollectionId, DEFAULT_PAGE_SIZE};
use crate::store::Network;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub contract: ContractConfig,
    #[serde(default)]
    pub browse: BrowseConfig,
}

/// Document store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default = "default_network")]
    pub network: Network,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
        }
    }
}

fn default_network() -> Network {
    Network::Testnet
}

/// Which data contract holds the torrent collections.
///
/// Either `id` (as assigned by the store) or `owner_id` + `entropy` (to
/// derive it) must be set before browsing.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContractConfig {
    /// Store-assigned contract id (base-58).
    #[serde(default)]
    pub id: Option<String>,
    /// Identity that published the contract (base-58).
    #[serde(default)]
    pub owner_id: Option<String>,
    /// 32 bytes of publication entropy, hex encoded.
    #[serde(default)]
    pub entropy: Option<String>,
}

impl ContractConfig {
    /// Decode the configured entropy, if any.
    pub fn entropy_bytes(&self) -> Result<Option<[u8; 32]>, CodecError> {
        let Some(entropy) = self.entropy.as_deref() else {
            return Ok(None);
        };
        let mut out = [0u8; 32];
        decode_hex_exact(entropy.trim(), &mut out)?;
        Ok(Some(out))
    }
}

/// Browse configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrowseConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_collection")]
    pub default_collection: CollectionId,
}

impl Default for BrowseConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            default_collection: default_collection(),
        }
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_collection() -> CollectionId {
    CollectionId::Movie
}

/// Sanitized config for display (entropy redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub store: StoreConfig,
    pub contract: SanitizedContractConfig,
    pub browse: BrowseConfig,
}

/// Sanitized contract config (entropy hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedContractConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    pub entropy_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            store: config.store.clone(),
            contract: SanitizedContractConfig {
                id: config.contract.id.clone(),
                owner_id: config.contract.owner_id.clone(),
                entropy_configured: config
                    .contract
                    .entropy
                    .as_deref()
                    .is_some_and(|e| !e.trim().is_empty()),
            },
            browse: config.browse.clone(),
        }
    }
}
