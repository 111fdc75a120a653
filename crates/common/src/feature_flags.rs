// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Boolean feature flags.
//!
//! Flags are addressed as `<section>.<name>` (case-insensitive) and resolved in order from:
//!
//! 1. The environment variable `AMP_FEATURE_<SECTION>_<NAME>`.
//! 2. `features.<section>.<name>` in the project's `cli.json`.
//! 3. The registered default.
//!
//! Unregistered flags are always off.

use std::{collections::HashMap, sync::Arc};

use project_env::{EnvError, Environment};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    json_util::{JsonFileError, read_json_if_exists},
    path_manager::PathManager,
};

pub const IMPROVE_PLURALIZATION: &str = "graphqltransformer.improvepluralization";

const FEATURE_ENV_PREFIX: &str = "AMP_FEATURE_";

/// Flags understood by the tooling, with their defaults.
const KNOWN_FLAGS: &[(&str, bool)] = &[(IMPROVE_PLURALIZATION, false)];

pub trait FeatureFlags {
    fn get_boolean(&self, key: &str) -> bool;
}

#[derive(Error, Debug)]
pub enum FeatureFlagError {
    #[error("{0}")]
    File(#[from] JsonFileError),

    #[error("{0}")]
    Env(#[from] EnvError),

    #[error("Feature flag '{key}' in {file} must be a boolean")]
    NotBoolean { key: String, file: String },
}

#[derive(Deserialize, Debug, Default)]
struct CliJson {
    #[serde(default)]
    features: HashMap<String, HashMap<String, serde_json::Value>>,
}

/// Feature flags of a project, resolved once at load time.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProjectFeatureFlags {
    values: HashMap<String, bool>,
}

impl ProjectFeatureFlags {
    pub fn load(paths: &PathManager, env: Arc<dyn Environment>) -> Result<Self, FeatureFlagError> {
        let cli_json_path = paths.cli_json_path();
        let cli_json: CliJson = read_json_if_exists(&cli_json_path)?.unwrap_or_default();

        let file_values: HashMap<String, serde_json::Value> = cli_json
            .features
            .into_iter()
            .flat_map(|(section, flags)| {
                flags
                    .into_iter()
                    .map(move |(name, value)| (normalize_key(&format!("{section}.{name}")), value))
            })
            .collect();

        let mut values = HashMap::new();
        for (key, default_value) in KNOWN_FLAGS {
            let value = match env.enabled_opt(&env_key(key))? {
                Some(value) => value,
                None => match file_values.get(*key) {
                    Some(value) => value.as_bool().ok_or_else(|| FeatureFlagError::NotBoolean {
                        key: key.to_string(),
                        file: cli_json_path.display().to_string(),
                    })?,
                    None => *default_value,
                },
            };
            values.insert(key.to_string(), value);
        }

        Ok(Self { values })
    }
}

impl FeatureFlags for ProjectFeatureFlags {
    fn get_boolean(&self, key: &str) -> bool {
        self.values
            .get(&normalize_key(key))
            .copied()
            .unwrap_or(false)
    }
}

fn normalize_key(key: &str) -> String {
    key.to_lowercase()
}

fn env_key(key: &str) -> String {
    format!("{FEATURE_ENV_PREFIX}{}", key.replace('.', "_").to_uppercase())
}

#[cfg(test)]
mod tests {
    use project_env::MapEnvironment;
    use serde_json::json;

    use super::*;
    use crate::test_support::ProjectFixture;

    #[test]
    fn defaults_without_cli_json() {
        let project = ProjectFixture::new();
        let flags =
            ProjectFeatureFlags::load(&project.paths(), Arc::new(MapEnvironment::new())).unwrap();

        assert!(!flags.get_boolean(IMPROVE_PLURALIZATION));
        assert!(!flags.get_boolean("unknown.flag"));
    }

    #[test]
    fn cli_json_values_are_case_insensitive() {
        let project = ProjectFixture::new();
        project.write_json(
            "amplify/cli.json",
            &json!({
                "features": {
                    "graphQLTransformer": {"improvePluralization": true, "transformerVersion": 2}
                }
            }),
        );

        let flags =
            ProjectFeatureFlags::load(&project.paths(), Arc::new(MapEnvironment::new())).unwrap();

        assert!(flags.get_boolean("graphQLTransformer.improvePluralization"));
        assert!(flags.get_boolean(IMPROVE_PLURALIZATION));
    }

    #[test]
    fn unregistered_flags_stay_off() {
        let project = ProjectFixture::new();
        project.write_json(
            "amplify/cli.json",
            &json!({"features": {"graphqltransformer": {"validatetypenamereservedwords": true}}}),
        );
        let env = MapEnvironment::from([(
            "AMP_FEATURE_GRAPHQLTRANSFORMER_USEEXPERIMENTALPIPELINEDTRANSFORMER",
            "true",
        )]);

        let flags = ProjectFeatureFlags::load(&project.paths(), Arc::new(env)).unwrap();

        assert!(!flags.get_boolean("graphqltransformer.validatetypenamereservedwords"));
        assert!(!flags.get_boolean("graphqltransformer.useexperimentalpipelinedtransformer"));
    }

    #[test]
    fn environment_overrides_cli_json() {
        let project = ProjectFixture::new();
        project.write_json(
            "amplify/cli.json",
            &json!({"features": {"graphqltransformer": {"improvepluralization": true}}}),
        );
        let env = MapEnvironment::from([(
            "AMP_FEATURE_GRAPHQLTRANSFORMER_IMPROVEPLURALIZATION",
            "false",
        )]);

        let flags = ProjectFeatureFlags::load(&project.paths(), Arc::new(env)).unwrap();

        assert!(!flags.get_boolean(IMPROVE_PLURALIZATION));
    }

    #[test]
    fn non_boolean_flag() {
        let project = ProjectFixture::new();
        project.write_json(
            "amplify/cli.json",
            &json!({"features": {"graphqltransformer": {"improvepluralization": "yes"}}}),
        );

        let result = ProjectFeatureFlags::load(&project.paths(), Arc::new(MapEnvironment::new()));

        assert!(matches!(result, Err(FeatureFlagError::NotBoolean { .. })));
    }
}
