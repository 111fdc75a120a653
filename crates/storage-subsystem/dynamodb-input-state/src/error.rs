// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use common::json_util::JsonFileError;
use thiserror::Error;

use crate::SchemaValidationError;

#[derive(Error, Debug)]
pub enum InputStateError {
    #[error("cli-inputs.json file missing from the resource directory of '{resource}' ({})", path.display())]
    ConfigMissing { resource: String, path: PathBuf },

    #[error("Invalid configuration for '{resource}': {source}")]
    ConfigMalformed {
        resource: String,
        #[source]
        source: JsonFileError,
    },

    #[error("Cannot migrate '{resource}': {} not found", path.display())]
    LegacySourceMissing { resource: String, path: PathBuf },

    #[error("Cannot migrate '{resource}': {message} ({})", path.display())]
    LegacySourceMalformed {
        resource: String,
        path: PathBuf,
        message: String,
    },

    #[error("Configuration for '{resource}' does not match its schema: {source}")]
    SchemaInvalid {
        resource: String,
        #[source]
        source: SchemaValidationError,
    },

    #[error("Failed to save configuration of '{resource}' to {}: {source}", path.display())]
    PersistError {
        resource: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
