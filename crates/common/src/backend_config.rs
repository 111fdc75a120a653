// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::{Map, Value, json};

use crate::{
    json_util::{JsonFileError, read_json_if_exists, write_json},
    path_manager::PathManager,
};

/// How a resource is provisioned, as recorded in `backend-config.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceEntry {
    pub service: String,
    pub provider_plugin: String,
}

/// The project's resource registry, keyed by category and then resource name.
///
/// Entries written by other tools are kept as-is.
pub struct BackendConfig {
    paths: PathManager,
    categories: Map<String, Value>,
}

impl BackendConfig {
    pub fn load(paths: &PathManager) -> Result<Self, JsonFileError> {
        let categories = read_json_if_exists(&paths.backend_config_path())?.unwrap_or_default();

        Ok(Self {
            paths: paths.clone(),
            categories,
        })
    }

    pub fn contains(&self, category: &str, resource_name: &str) -> bool {
        self.categories
            .get(category)
            .and_then(|resources| resources.get(resource_name))
            .is_some()
    }

    pub fn resource_names(&self, category: &str) -> Vec<String> {
        self.categories
            .get(category)
            .and_then(Value::as_object)
            .map(|resources| resources.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn add_resource(&mut self, category: &str, resource_name: &str, entry: &ResourceEntry) {
        let resources = self
            .categories
            .entry(category)
            .or_insert_with(|| Value::Object(Map::new()));

        if !resources.is_object() {
            *resources = Value::Object(Map::new());
        }

        if let Value::Object(resources) = resources {
            resources.insert(
                resource_name.to_string(),
                json!({
                    "service": entry.service,
                    "providerPlugin": entry.provider_plugin,
                }),
            );
        }
    }

    pub fn save(&self) -> Result<(), JsonFileError> {
        let path = self.paths.backend_config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| JsonFileError::Write {
                path: path.clone(),
                source,
            })?;
        }
        write_json(&path, &self.categories)
    }
}
