// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use common::{
    json_util::{self, JsonFileError, read_json, read_json_if_exists, write_json},
    path_manager::PathManager,
};
use serde::de::DeserializeOwned;

use crate::{
    CliInputValidator, InputStateError, JsonSchemaValidator, ResourceInputConfig, STORAGE_CATEGORY,
    SchemaId,
    legacy::{
        self, LegacyFile, LegacyParameters, LegacyStorageParams, LegacyTemplate,
        LegacyTranslationError,
    },
};

const CLI_INPUTS_FILE_NAME: &str = "cli-inputs.json";
const BUILD_DIR_NAME: &str = "build";
const LEGACY_PARAMETERS_FILE_NAME: &str = "parameters.json";
const LEGACY_STORAGE_PARAMS_FILE_NAME: &str = "storage-params.json";

/// A legacy file that could not be removed after a successful migration.
#[derive(Debug)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub error: std::io::Error,
}

/// Outcome of a successful [`DynamoDbInputState::migrate`].
#[derive(Debug)]
pub struct MigrationReport {
    pub config: ResourceInputConfig,
    /// Legacy attribute type codes that had no counterpart and were migrated as `null`.
    pub unmapped_type_codes: Vec<String>,
    pub cleanup_failures: Vec<CleanupFailure>,
}

/// Reads, validates, writes and migrates the configuration of one DynamoDB resource.
pub struct DynamoDbInputState {
    resource_name: String,
    resource_dir: PathBuf,
    cli_inputs_file_path: PathBuf,
    validator: Arc<dyn CliInputValidator>,
    schema: SchemaId,
}

impl DynamoDbInputState {
    pub fn new(paths: &PathManager, resource_name: &str) -> Self {
        let resource_dir = paths.resource_dir(STORAGE_CATEGORY, resource_name);

        Self {
            resource_name: resource_name.to_string(),
            cli_inputs_file_path: resource_dir.join(CLI_INPUTS_FILE_NAME),
            resource_dir,
            validator: Arc::new(JsonSchemaValidator),
            schema: SchemaId::dynamodb_cli_inputs(),
        }
    }

    pub fn with_validator(mut self, validator: Arc<dyn CliInputValidator>) -> Self {
        self.validator = validator;
        self
    }

    pub fn cli_inputs_file_path(&self) -> &Path {
        &self.cli_inputs_file_path
    }

    pub fn build_dir(&self) -> PathBuf {
        self.resource_dir.join(BUILD_DIR_NAME)
    }

    pub fn canonical_config_exists(&self) -> bool {
        self.cli_inputs_file_path.exists()
    }

    /// Whether the resource still uses the multi-file layout (its parameters file is present).
    pub fn legacy_sources_exist(&self) -> bool {
        self.legacy_parameters_path().exists()
    }

    /// Load the resource's `cli-inputs.json`, migrating the legacy layout first if that is all
    /// the resource has.
    pub fn load_canonical_config(&self) -> Result<ResourceInputConfig, InputStateError> {
        if !self.canonical_config_exists() {
            if self.legacy_sources_exist() {
                tracing::debug!(
                    "No cli-inputs.json for {}, migrating legacy files",
                    self.resource_name
                );
                return Ok(self.migrate()?.config);
            }
            return Err(self.config_missing());
        }

        read_json(&self.cli_inputs_file_path).map_err(|e| match e {
            // Removed between the existence check and the read
            JsonFileError::NotFound(_) => self.config_missing(),
            source => InputStateError::ConfigMalformed {
                resource: self.resource_name.clone(),
                source,
            },
        })
    }

    pub fn validate(&self, config: &ResourceInputConfig) -> Result<(), InputStateError> {
        let serialized = serde_json::to_string(config).map_err(|e| {
            InputStateError::SchemaInvalid {
                resource: self.resource_name.clone(),
                source: e.into(),
            }
        })?;

        self.validator
            .validate_input(&self.schema, &serialized)
            .map_err(|source| InputStateError::SchemaInvalid {
                resource: self.resource_name.clone(),
                source,
            })
    }

    /// Validate the configuration currently on disk.
    pub fn validate_stored(&self) -> Result<ResourceInputConfig, InputStateError> {
        let config = self.load_canonical_config()?;
        self.validate(&config)?;
        Ok(config)
    }

    /// Validate and atomically replace `cli-inputs.json`.
    pub fn save(&self, config: &ResourceInputConfig) -> Result<(), InputStateError> {
        self.validate(config)?;

        std::fs::create_dir_all(&self.resource_dir).map_err(|source| self.persist_error(source))?;

        write_json(&self.cli_inputs_file_path, config).map_err(|e| match e {
            JsonFileError::Write { source, .. } => self.persist_error(source),
            JsonFileError::Serialize { source, .. } => self.persist_error(source.into()),
            other => self.persist_error(std::io::Error::other(other)),
        })
    }

    /// Fold the legacy files into `cli-inputs.json` and remove them.
    ///
    /// The legacy files are only removed once the new file has been saved. A resource whose
    /// legacy files are already gone fails with [`InputStateError::LegacySourceMissing`] and its
    /// `cli-inputs.json` is left untouched.
    pub fn migrate(&self) -> Result<MigrationReport, InputStateError> {
        let parameters_path = self.legacy_parameters_path();
        let template_path = self.legacy_template_path();
        let storage_params_path = self.legacy_storage_params_path();

        let parameters: LegacyParameters = self.read_legacy_source(&parameters_path)?;
        let template: LegacyTemplate = self.read_legacy_source(&template_path)?;
        let storage_params: LegacyStorageParams = read_json_if_exists(&storage_params_path)
            .map_err(|e| self.legacy_malformed(e.path(), e.to_string()))?
            .unwrap_or_default();

        let translation = legacy::translate(&self.resource_name, parameters, template, storage_params)
            .map_err(|LegacyTranslationError { file, message }| {
                let path = match file {
                    LegacyFile::Parameters => &parameters_path,
                    LegacyFile::Template => &template_path,
                };
                self.legacy_malformed(path, message)
            })?;

        self.save(&translation.config)?;

        let cleanup_failures =
            remove_legacy_files([template_path, parameters_path, storage_params_path]);

        Ok(MigrationReport {
            config: translation.config,
            unmapped_type_codes: translation.unmapped_type_codes,
            cleanup_failures,
        })
    }

    /// Migrate unless `cli-inputs.json` already exists. `None` means there was nothing to do.
    pub fn migrate_if_needed(&self) -> Result<Option<MigrationReport>, InputStateError> {
        if self.canonical_config_exists() {
            return Ok(None);
        }
        self.migrate().map(Some)
    }

    fn read_legacy_source<T: DeserializeOwned>(&self, path: &Path) -> Result<T, InputStateError> {
        read_json(path).map_err(|e| match e {
            JsonFileError::NotFound(path) => InputStateError::LegacySourceMissing {
                resource: self.resource_name.clone(),
                path,
            },
            other => self.legacy_malformed(other.path(), other.to_string()),
        })
    }

    fn legacy_parameters_path(&self) -> PathBuf {
        self.resource_dir.join(LEGACY_PARAMETERS_FILE_NAME)
    }

    fn legacy_template_path(&self) -> PathBuf {
        self.resource_dir
            .join(format!("{}-cloudformation-template.json", self.resource_name))
    }

    fn legacy_storage_params_path(&self) -> PathBuf {
        self.resource_dir.join(LEGACY_STORAGE_PARAMS_FILE_NAME)
    }

    fn config_missing(&self) -> InputStateError {
        InputStateError::ConfigMissing {
            resource: self.resource_name.clone(),
            path: self.cli_inputs_file_path.clone(),
        }
    }

    fn legacy_malformed(&self, path: &Path, message: String) -> InputStateError {
        InputStateError::LegacySourceMalformed {
            resource: self.resource_name.clone(),
            path: path.to_path_buf(),
            message,
        }
    }

    fn persist_error(&self, source: std::io::Error) -> InputStateError {
        InputStateError::PersistError {
            resource: self.resource_name.clone(),
            path: self.cli_inputs_file_path.clone(),
            source,
        }
    }
}

/// Remove each file that exists. Failures are collected and do not stop the remaining removals.
fn remove_legacy_files(paths: impl IntoIterator<Item = PathBuf>) -> Vec<CleanupFailure> {
    paths
        .into_iter()
        .filter_map(|path| match json_util::remove_if_exists(&path) {
            Ok(_) => None,
            Err(error) => {
                tracing::debug!("Failed to remove {}: {error}", path.display());
                Some(CleanupFailure { path, error })
            }
        })
        .collect()
}
