// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

use crate::AttributeType;

/// A partition or sort key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyDescriptor {
    pub field_name: String,
    /// `None` for the `null` type and for types that could not be resolved.
    #[serde(default)]
    pub field_type: Option<AttributeType>,
}

impl KeyDescriptor {
    pub fn new(field_name: impl Into<String>, field_type: Option<AttributeType>) -> Self {
        Self {
            field_name: field_name.into(),
            field_type,
        }
    }
}

/// A global secondary index.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IndexDescriptor {
    pub name: String,
    pub partition_key: KeyDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<KeyDescriptor>,
}

/// The canonical configuration of a DynamoDB resource, persisted as `cli-inputs.json`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceInputConfig {
    pub resource_name: String,
    pub table_name: String,
    pub partition_key: KeyDescriptor,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<KeyDescriptor>,
    #[serde(default)]
    pub trigger_functions: Vec<String>,
    #[serde(default)]
    pub gsi: Vec<IndexDescriptor>,
}
