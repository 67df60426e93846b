//! Subcommand implementations. Each returns the JSON document to print.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use magnetdex_core::{
    build_magnet_uri, derive_contract_id, format_typed_id, load_config, parse_magnet_link,
    parse_tracker_list, parse_typed_id, validate_config, ContractConfig, IdFormat,
    SanitizedConfig, Trackers,
};

use crate::cli::{ConfigCommand, ContractIdArgs, IdCommand, MagnetBuildArgs, MagnetCommand};

pub fn magnet(command: &MagnetCommand) -> Result<Value> {
    match command {
        MagnetCommand::Parse { uri } => {
            let link = parse_magnet_link(uri);
            if link.info_hash.is_none() {
                debug!(uri = %uri, "No btih info hash found");
            }
            Ok(serde_json::to_value(link)?)
        }
        MagnetCommand::Build(args) => build_magnet(args),
    }
}

fn build_magnet(args: &MagnetBuildArgs) -> Result<Value> {
    let trackers: Trackers = args.trackers.iter().collect();
    let ignored = args.trackers.len() - trackers.len();
    if ignored > 0 {
        info!(ignored, "Dropped duplicate or unsupported trackers");
    }

    let uri = build_magnet_uri(args.hash.as_str(), args.name.as_deref(), &trackers)
        .context("Failed to build magnet URI")?;
    Ok(json!({ "uri": uri }))
}

pub fn contract_id(args: &ContractIdArgs) -> Result<Value> {
    let config = ContractConfig {
        id: None,
        owner_id: Some(args.owner.clone()),
        entropy: Some(args.entropy.clone()),
    };
    let entropy = config
        .entropy_bytes()
        .context("Entropy must be 32 bytes of hex")?
        .context("Entropy is required")?;
    let id = derive_contract_id(&args.owner, &entropy).context("Owner id is not base-58")?;
    Ok(json!({ "owner_id": args.owner, "contract_id": id }))
}

#[derive(Debug, Serialize)]
struct TypedIdOutput {
    format: IdFormat,
    id: u64,
    formatted: String,
    url: String,
}

impl TypedIdOutput {
    fn new(format: IdFormat, id: u64) -> Self {
        Self {
            format,
            id,
            formatted: format_typed_id(id, format),
            url: format.external_url(id),
        }
    }
}

pub fn id(command: &IdCommand) -> Result<Value> {
    let output = match command {
        IdCommand::Parse { format, text } => {
            let format = IdFormat::from(*format);
            let id = parse_typed_id(text, format)
                .with_context(|| format!("{:?} is not a valid {} id", text, format))?;
            TypedIdOutput::new(format, id)
        }
        IdCommand::Format { format, id } => TypedIdOutput::new((*format).into(), *id),
    };
    Ok(serde_json::to_value(output)?)
}

pub fn trackers(text: &str) -> Result<Value> {
    let trackers = parse_tracker_list(text);
    Ok(json!({
        "trackers": trackers,
        "stored": trackers.to_stored(),
    }))
}

pub fn config(command: &ConfigCommand) -> Result<Value> {
    match command {
        ConfigCommand::Check { config } => check_config(&resolve_config_path(config.as_deref())),
    }
}

fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(|| {
        std::env::var("MAGNETDEX_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"))
    })
}

fn check_config(path: &Path) -> Result<Value> {
    info!("Loading configuration from {:?}", path);
    let config =
        load_config(path).with_context(|| format!("Failed to load config from {:?}", path))?;
    validate_config(&config).context("Configuration validation failed")?;

    let derived_contract_id = match (
        config.contract.owner_id.as_deref(),
        config.contract.entropy_bytes()?,
    ) {
        (Some(owner), Some(entropy)) => Some(derive_contract_id(owner, &entropy)?),
        _ => None,
    };

    Ok(json!({
        "config": SanitizedConfig::from(&config),
        "derived_contract_id": derived_contract_id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HASH: &str = "dd8255ecdc7ca55fb0bbf81323d87062db1f6d1c";

    #[test]
    fn test_magnet_parse_output() {
        let uri = format!("magnet:?xt=urn:btih:{}&dn=Big+Buck+Bunny&tr=udp%3A%2F%2Fa%3A1", HASH);
        let value = magnet(&MagnetCommand::Parse { uri }).unwrap();
        assert_eq!(value["info_hash"], HASH);
        assert_eq!(value["display_name"], "Big Buck Bunny");
        assert_eq!(value["trackers"], json!(["udp://a:1"]));
    }

    #[test]
    fn test_magnet_build_rejects_bad_hash() {
        let args = MagnetBuildArgs {
            hash: "1234".to_string(),
            name: None,
            trackers: vec![],
        };
        assert!(build_magnet(&args).is_err());
    }

    #[test]
    fn test_magnet_build_output() {
        let args = MagnetBuildArgs {
            hash: HASH.to_string(),
            name: None,
            trackers: vec!["ftp://nope".to_string()],
        };
        let value = build_magnet(&args).unwrap();
        assert_eq!(value["uri"], format!("magnet:?xt=urn:btih:{}", HASH));
    }

    #[test]
    fn test_contract_id_output() {
        let args = ContractIdArgs {
            owner: "4EfA9Jrvv3nnCFdSf7fad59851iiTRZ6Wcu6YVJ4iSeF".to_string(),
            entropy: "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"
                .to_string(),
        };
        let value = contract_id(&args).unwrap();
        assert_eq!(
            value["contract_id"],
            "4G82b52w5s9ADKB8MeUdiwu2UGXKUAHw9848khNc95Px"
        );
    }

    #[test]
    fn test_id_parse_output() {
        let value = id(&IdCommand::Parse {
            format: crate::cli::IdFormatArg::Imdb,
            text: "tt0133093".to_string(),
        })
        .unwrap();
        assert_eq!(value["id"], 133093);
        assert_eq!(value["formatted"], "tt0133093");
        assert_eq!(value["format"], "imdb");
    }

    #[test]
    fn test_id_parse_invalid() {
        let result = id(&IdCommand::Parse {
            format: crate::cli::IdFormatArg::OpenlibraryWork,
            text: "OL12M".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_trackers_output() {
        let value = trackers("udp://a:1, http://b\nudp://a:1\nbogus").unwrap();
        assert_eq!(value["trackers"], json!(["udp://a:1", "http://b"]));
        assert_eq!(value["stored"], "udp://a:1\nhttp://b");
    }

    #[test]
    fn test_config_check_hides_entropy() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[contract]
owner_id = "4EfA9Jrvv3nnCFdSf7fad59851iiTRZ6Wcu6YVJ4iSeF"
entropy = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f"
"#
        )
        .unwrap();

        let value = check_config(file.path()).unwrap();
        assert_eq!(
            value["derived_contract_id"],
            "4G82b52w5s9ADKB8MeUdiwu2UGXKUAHw9848khNc95Px"
        );
        assert_eq!(value["config"]["contract"]["entropy_configured"], true);
        assert!(!value.to_string().contains("0a0b0c"));
    }

    #[test]
    fn test_config_check_missing_file() {
        assert!(check_config(Path::new("/nonexistent/magnetdex.toml")).is_err());
    }
}
