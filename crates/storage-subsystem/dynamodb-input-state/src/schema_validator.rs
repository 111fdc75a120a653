// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use jsonschema::JSONSchema;
use serde_json::Value;
use thiserror::Error;

use crate::{DYNAMODB_SERVICE, STORAGE_CATEGORY};

static DYNAMODB_CLI_INPUTS_SCHEMA: &str = include_str!("schemas/DynamoDBCLIInputs.schema.json");

/// Identifies the schema a resource's `cli-inputs.json` must follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaId {
    pub category: String,
    pub service: String,
    pub schema_name: String,
}

impl SchemaId {
    pub fn new(category: &str, service: &str, schema_name: &str) -> Self {
        Self {
            category: category.to_string(),
            service: service.to_string(),
            schema_name: schema_name.to_string(),
        }
    }

    pub fn dynamodb_cli_inputs() -> Self {
        Self::new(STORAGE_CATEGORY, DYNAMODB_SERVICE, "DynamoDBCLIInputs")
    }
}

impl Display for SchemaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.category, self.service, self.schema_name)
    }
}

#[derive(Error, Debug)]
pub enum SchemaValidationError {
    #[error("No schema named {0}")]
    UnknownSchema(String),

    #[error("Schema {schema} could not be compiled: {message}")]
    InvalidSchema { schema: String, message: String },

    #[error("Input is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Input does not match schema {schema}: {}", diagnostics.join("; "))]
    Mismatch {
        schema: String,
        diagnostics: Vec<String>,
    },
}

/// Checks a serialized input document against a named schema.
pub trait CliInputValidator: Send + Sync {
    fn validate_input(&self, schema: &SchemaId, input: &str) -> Result<(), SchemaValidationError>;
}

/// Validator backed by the JSON schemas embedded in this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaValidator;

impl JsonSchemaValidator {
    fn schema_source(schema: &SchemaId) -> Option<&'static str> {
        match (
            schema.category.as_str(),
            schema.service.as_str(),
            schema.schema_name.as_str(),
        ) {
            (STORAGE_CATEGORY, DYNAMODB_SERVICE, "DynamoDBCLIInputs") => {
                Some(DYNAMODB_CLI_INPUTS_SCHEMA)
            }
            _ => None,
        }
    }
}

impl CliInputValidator for JsonSchemaValidator {
    fn validate_input(&self, schema: &SchemaId, input: &str) -> Result<(), SchemaValidationError> {
        let source = Self::schema_source(schema)
            .ok_or_else(|| SchemaValidationError::UnknownSchema(schema.to_string()))?;

        let invalid_schema = |message: String| SchemaValidationError::InvalidSchema {
            schema: schema.to_string(),
            message,
        };

        let schema_value: Value =
            serde_json::from_str(source).map_err(|e| invalid_schema(e.to_string()))?;
        let compiled =
            JSONSchema::compile(&schema_value).map_err(|e| invalid_schema(e.to_string()))?;

        let instance: Value = serde_json::from_str(input)?;

        let diagnostics: Vec<String> = match compiled.validate(&instance) {
            Ok(()) => vec![],
            Err(errors) => errors
                .map(|error| {
                    let location = error.instance_path.to_string();
                    if location.is_empty() {
                        error.to_string()
                    } else {
                        format!("{location}: {error}")
                    }
                })
                .collect(),
        };

        if diagnostics.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::Mismatch {
                schema: schema.to_string(),
                diagnostics,
            })
        }
    }
}
