// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::Path;

use anyhow::{Result, anyhow};
use semver::VersionReq;
use serde::Deserialize;

use crate::provider::supported_services;

use super::model::{AmpConfig, Config, StorageConfig};

const CONFIG_FILE_NAME: &str = "amp.toml";

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigSer {
    pub amp: Option<AmpSer>,
    pub storage: Option<StorageSer>,
}

#[derive(Deserialize, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct AmpSer {
    pub version: Option<String>,
}

#[derive(Deserialize, Debug, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct StorageSer {
    #[serde(rename = "default-service")]
    pub default_service: Option<String>,
}

impl TryFrom<ConfigSer> for Config {
    type Error = anyhow::Error;

    fn try_from(config: ConfigSer) -> Result<Self, Self::Error> {
        Ok(Config {
            amp: config.amp.map(AmpConfig::try_from).transpose()?,
            storage: config
                .storage
                .map(StorageConfig::try_from)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

impl TryFrom<AmpSer> for AmpConfig {
    type Error = anyhow::Error;

    fn try_from(config: AmpSer) -> Result<Self, Self::Error> {
        let version = config
            .version
            .map(|version_req_str| parse_version_req(&version_req_str))
            .transpose()?;

        Ok(AmpConfig { version })
    }
}

impl TryFrom<StorageSer> for StorageConfig {
    type Error = anyhow::Error;

    fn try_from(config: StorageSer) -> Result<Self, Self::Error> {
        if let Some(service) = &config.default_service
            && !supported_services()
                .iter()
                .any(|metadata| metadata.service == service.as_str())
        {
            return Err(anyhow!("Unknown storage service: {}", service));
        }

        Ok(StorageConfig {
            default_service: config.default_service,
        })
    }
}

/// Parse a version requirement the way package managers do: a bare `1.2.3` means `=1.2.3`
/// rather than semver's `^1.2.3`.
fn parse_version_req(version_req_str: &str) -> Result<VersionReq> {
    let version_req = VersionReq::parse(version_req_str)
        .map_err(|_| anyhow!("Invalid version: {}", version_req_str))?;

    let mut comparators = version_req.comparators;

    // See https://github.com/dtolnay/semver/issues/311
    comparators
        .iter_mut()
        .zip(version_req_str.split(','))
        .for_each(|(comparator, part)| {
            if !part.trim().starts_with('^') && comparator.op == semver::Op::Caret {
                comparator.op = semver::Op::Exact;
            }
        });

    Ok(VersionReq { comparators })
}

fn load_config_from_file(path: &Path) -> Result<Config> {
    let toml_str = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read file '{}': {}", path.display(), e))?;
    let config: ConfigSer = toml::from_str(&toml_str)
        .map_err(|e| anyhow!("Failed to parse TOML file '{}': {}", path.display(), e))?;

    config.try_into()
}

pub fn load_config() -> Result<Config> {
    let config_path = Path::new(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let config = load_config_from_file(config_path)?;
    tracing::debug!("Loaded {}: {:?}", CONFIG_FILE_NAME, config);

    config.assert_tool_version()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_test_config(name: &str) -> Result<Config> {
        let test_configs_dir =
            Path::new(env!("CARGO_MANIFEST_DIR")).join("src/config/test-configs");
        let file_path = test_configs_dir.join(format!("{}.toml", name));
        load_config_from_file(&file_path)
    }

    #[test]
    fn test_load_empty_config() {
        let config = load_test_config("empty").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_with_version() {
        let config = load_test_config("version").unwrap();
        assert_eq!(
            config,
            Config {
                amp: Some(AmpConfig {
                    version: Some(VersionReq::parse("=0.1.0").unwrap()),
                }),
                storage: StorageConfig::default(),
            }
        );
    }

    #[test]
    fn test_load_storage_config() {
        let config = load_test_config("storage").unwrap();
        assert_eq!(
            config.storage,
            StorageConfig {
                default_service: Some("DynamoDB".to_string()),
            }
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = load_test_config("unknown-key").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML file"));
    }

    #[test]
    fn test_unknown_service_is_rejected() {
        let err = load_test_config("unknown-service").unwrap_err();
        assert_eq!(err.to_string(), "Unknown storage service: S3");
    }

    #[test]
    fn test_version_req_operators() {
        assert_eq!(
            parse_version_req("0.1.0").unwrap(),
            VersionReq::parse("=0.1.0").unwrap()
        );
        assert_eq!(
            parse_version_req("^0.1.0").unwrap(),
            VersionReq::parse("^0.1.0").unwrap()
        );
        assert_eq!(
            parse_version_req(">=0.1.0, 0.2.0").unwrap(),
            VersionReq::parse(">=0.1.0, =0.2.0").unwrap()
        );
        assert!(parse_version_req("not-a-version").is_err());
    }
}
