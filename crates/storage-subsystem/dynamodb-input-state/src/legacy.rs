// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The pre-`cli-inputs.json` layout of a DynamoDB resource and its translation.

use serde::Deserialize;
use serde_json::Value;

use crate::{AttributeType, IndexDescriptor, KeyDescriptor, ResourceInputConfig};

/// `parameters.json`
///
/// Type codes are kept as raw JSON so that a code of the wrong JSON type is reported as unmapped
/// instead of failing the whole file.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegacyParameters {
    pub table_name: Option<String>,
    pub partition_key_name: Option<String>,
    pub partition_key_type: Option<Value>,
    pub sort_key_name: Option<String>,
    pub sort_key_type: Option<Value>,
}

/// `<resource>-cloudformation-template.json`, reduced to the parts the migration reads.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct LegacyTemplate {
    #[serde(rename = "Resources", default)]
    resources: Option<TemplateResources>,
}

#[derive(Deserialize, Debug, Default)]
struct TemplateResources {
    #[serde(rename = "DynamoDBTable", default)]
    table: Option<TemplateTable>,
}

#[derive(Deserialize, Debug, Default)]
struct TemplateTable {
    #[serde(rename = "Properties", default)]
    properties: Option<TableProperties>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "PascalCase")]
struct TableProperties {
    #[serde(default)]
    attribute_definitions: Vec<AttributeDefinition>,
    #[serde(default)]
    global_secondary_indexes: Option<Vec<GlobalSecondaryIndex>>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct AttributeDefinition {
    attribute_name: String,
    #[serde(default)]
    attribute_type: Option<Value>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct GlobalSecondaryIndex {
    index_name: String,
    #[serde(default)]
    key_schema: Vec<KeySchemaElement>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "PascalCase")]
struct KeySchemaElement {
    attribute_name: String,
    key_type: String,
}

const HASH_KEY_TYPE: &str = "HASH";

/// `storage-params.json`
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LegacyStorageParams {
    #[serde(default)]
    pub trigger_functions: Option<Vec<String>>,
}

/// Which legacy file a translation problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LegacyFile {
    Parameters,
    Template,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) struct LegacyTranslationError {
    pub file: LegacyFile,
    pub message: String,
}

#[derive(Debug)]
pub(crate) struct Translation {
    pub config: ResourceInputConfig,
    pub unmapped_type_codes: Vec<String>,
}

#[derive(Default)]
struct TypeResolver {
    unmapped: Vec<String>,
}

impl TypeResolver {
    /// Unknown codes resolve to `None` and are remembered instead of failing the migration.
    /// A code that is not a JSON string is unknown and remembered by its JSON text.
    fn resolve(&mut self, code: Option<&Value>) -> Option<AttributeType> {
        let unknown = match code? {
            Value::String(code) => match AttributeType::from_legacy_code(code) {
                Ok(attribute_type) => return attribute_type,
                Err(unknown) => unknown.0,
            },
            other => other.to_string(),
        };

        if !self.unmapped.contains(&unknown) {
            self.unmapped.push(unknown);
        }
        None
    }
}

pub(crate) fn translate(
    resource_name: &str,
    parameters: LegacyParameters,
    template: LegacyTemplate,
    storage_params: LegacyStorageParams,
) -> Result<Translation, LegacyTranslationError> {
    let mut types = TypeResolver::default();

    let missing_parameter = |name: &str| LegacyTranslationError {
        file: LegacyFile::Parameters,
        message: format!("'{name}' is not set"),
    };

    let table_name = parameters
        .table_name
        .ok_or_else(|| missing_parameter("tableName"))?;

    let partition_key = KeyDescriptor::new(
        parameters
            .partition_key_name
            .ok_or_else(|| missing_parameter("partitionKeyName"))?,
        types.resolve(parameters.partition_key_type.as_ref()),
    );

    let sort_key = parameters.sort_key_name.map(|sort_key_name| {
        KeyDescriptor::new(
            sort_key_name,
            types.resolve(parameters.sort_key_type.as_ref()),
        )
    });

    let trigger_functions = storage_params.trigger_functions.unwrap_or_default();

    let properties = template
        .resources
        .and_then(|resources| resources.table)
        .and_then(|table| table.properties)
        .unwrap_or_default();

    let gsi = properties
        .global_secondary_indexes
        .unwrap_or_default()
        .into_iter()
        .map(|index| translate_index(index, &properties.attribute_definitions, &mut types))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Translation {
        config: ResourceInputConfig {
            resource_name: resource_name.to_string(),
            table_name,
            partition_key,
            sort_key,
            trigger_functions,
            gsi,
        },
        unmapped_type_codes: types.unmapped,
    })
}

/// Key schema entries are applied in order: a `HASH` entry sets the partition key and any other
/// entry sets the sort key, so when an index lists several entries for the same role the last one
/// wins.
fn translate_index(
    index: GlobalSecondaryIndex,
    attribute_definitions: &[AttributeDefinition],
    types: &mut TypeResolver,
) -> Result<IndexDescriptor, LegacyTranslationError> {
    let mut partition_key = None;
    let mut sort_key = None;

    for element in index.key_schema {
        let field_type = types.resolve(attribute_type_code(
            attribute_definitions,
            &element.attribute_name,
        ));
        let key = KeyDescriptor::new(element.attribute_name, field_type);

        if element.key_type == HASH_KEY_TYPE {
            partition_key = Some(key);
        } else {
            sort_key = Some(key);
        }
    }

    let partition_key = partition_key.ok_or_else(|| LegacyTranslationError {
        file: LegacyFile::Template,
        message: format!("index '{}' has no {HASH_KEY_TYPE} key", index.index_name),
    })?;

    Ok(IndexDescriptor {
        name: index.index_name,
        partition_key,
        sort_key,
    })
}

/// The type code of the last definition for `attribute_name`, if any.
fn attribute_type_code<'a>(
    attribute_definitions: &'a [AttributeDefinition],
    attribute_name: &str,
) -> Option<&'a Value> {
    attribute_definitions
        .iter()
        .rev()
        .find(|definition| definition.attribute_name == attribute_name)
        .and_then(|definition| definition.attribute_type.as_ref())
}
