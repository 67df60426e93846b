use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment variable overrides, e.g. `MAGNETDEX_BROWSE__PAGE_SIZE`.
pub const ENV_PREFIX: &str = "MAGNETDEX_";

/// Read `path`, then apply `MAGNETDEX_*` environment overrides on top.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Parse a TOML document without touching the environment.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CollectionId;
    use crate::store::Network;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = load_config_from_str("[browse]\npage_size = 24\n").unwrap();
        assert_eq!(config.browse.page_size, 24);
        assert_eq!(config.browse.default_collection, CollectionId::Movie);
        assert_eq!(config.store.network, Network::Testnet);
    }

    #[test]
    fn test_unknown_network_is_a_parse_error() {
        let err = load_config_from_str("[store]\nnetwork = \"moonnet\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(ref msg) if msg.contains("moonnet")));
    }

    #[test]
    fn test_unknown_collection_is_a_parse_error() {
        let err = load_config_from_str("[browse]\ndefault_collection = \"music\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/magnetdex.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(ref p) if p.ends_with("magnetdex.toml")));
    }

    #[test]
    fn test_file_with_contract_section() {
        let file = write_config(
            r#"
[store]
network = "mainnet"

[contract]
id = "GfbYJ7kCXGxHwQZ5UWjN4Jnqj6SaWvszM7Y1cRaTCCRr"

[browse]
default_collection = "book"
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(
            config.contract.id.as_deref(),
            Some("GfbYJ7kCXGxHwQZ5UWjN4Jnqj6SaWvszM7Y1cRaTCCRr")
        );
        assert_eq!(config.store.network, Network::Mainnet);
        assert_eq!(config.browse.default_collection, CollectionId::Book);
        assert!(config.contract.entropy.is_none());
    }
}
