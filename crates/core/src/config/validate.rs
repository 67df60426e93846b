use super::{types::Config, ConfigError};
use crate::codec::base58_decode;
use crate::schema::MAX_PAGE_SIZE;

/// Validate configuration
/// Currently validates:
/// - Page size is between 1 and the store's query limit
/// - Contract ids are base-58
/// - Entropy is 32 bytes of hex and comes with an owner id
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Browse validation
    if config.browse.page_size == 0 || config.browse.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::ValidationError(format!(
            "browse.page_size must be between 1 and {}",
            MAX_PAGE_SIZE
        )));
    }

    // Contract validation
    let contract = &config.contract;
    for (key, value) in [("contract.id", &contract.id), ("contract.owner_id", &contract.owner_id)] {
        if let Some(value) = value {
            base58_decode(value)
                .map_err(|e| ConfigError::ValidationError(format!("{} is not base-58: {}", key, e)))?;
        }
    }

    contract
        .entropy_bytes()
        .map_err(|e| ConfigError::ValidationError(format!("contract.entropy: {}", e)))?;

    if contract.entropy.is_some() && contract.owner_id.is_none() {
        return Err(ConfigError::ValidationError(
            "contract.entropy requires contract.owner_id".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BrowseConfig, ContractConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_page_size_zero_fails() {
        let config = Config {
            browse: BrowseConfig {
                page_size: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_page_size_too_large_fails() {
        let config = Config {
            browse: BrowseConfig {
                page_size: 101,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_contract_id_must_be_base58() {
        let config = Config {
            contract: ContractConfig {
                id: Some("0OIl".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_entropy_requires_owner() {
        let config = Config {
            contract: ContractConfig {
                entropy: Some("11".repeat(32)),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("owner_id"));
    }

    #[test]
    fn test_validate_full_contract() {
        let config = Config {
            contract: ContractConfig {
                id: Some("4G82b52w5s9ADKB8MeUdiwu2UGXKUAHw9848khNc95Px".to_string()),
                owner_id: Some("4EfA9Jrvv3nnCFdSf7fad59851iiTRZ6Wcu6YVJ4iSeF".to_string()),
                entropy: Some("ab".repeat(32)),
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
