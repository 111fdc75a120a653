// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Configuration state of a DynamoDB storage resource.
//!
//! A resource is described by a single `cli-inputs.json` ([`ResourceInputConfig`]). Projects
//! created by older tooling instead carry three files (parameters, CloudFormation template and
//! storage params); [`DynamoDbInputState::migrate`] folds those into the canonical file.

mod attribute_type;
mod cli_inputs;
mod error;
mod input_state;
mod legacy;
mod schema_validator;

pub use attribute_type::{AttributeType, UnknownTypeCode};
pub use cli_inputs::{IndexDescriptor, KeyDescriptor, ResourceInputConfig};
pub use error::InputStateError;
pub use input_state::{CleanupFailure, DynamoDbInputState, MigrationReport};
pub use schema_validator::{CliInputValidator, JsonSchemaValidator, SchemaId, SchemaValidationError};

pub const STORAGE_CATEGORY: &str = "storage";
pub const DYNAMODB_SERVICE: &str = "DynamoDB";
