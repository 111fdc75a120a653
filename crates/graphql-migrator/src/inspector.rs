// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    collections::BTreeSet,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_graphql_parser::types::{ServiceDocument, TypeKind, TypeSystemDefinition};
use common::{
    feature_flags::{FeatureFlags, IMPROVE_PLURALIZATION},
    path_manager::PathManager,
    state_manager::EnvironmentMetadata,
};

use crate::{
    API_CATEGORY, DeprecatedArgument, DirectiveUsageReport, InspectorError, collect_directives,
    collect_directives_by_type_names, parse_schema_document,
};

pub const SUPPORTED_DIRECTIVES: [&str; 8] = [
    "connection",
    "key",
    "searchable",
    "auth",
    "model",
    "function",
    "predictions",
    "aws_subscribe",
];

pub const DEPRECATED_CONNECTION_MARKER: &str = "Deprecated parameterization of @connection";

const CONNECTION_DIRECTIVE: &str = "connection";
const DEPRECATED_CONNECTION_ARGUMENTS: [&str; 4] = ["name", "keyField", "sortField", "limit"];

const ROOT_TYPE_NAMES: [&str; 3] = ["Mutation", "Query", "Subscription"];

const RESOLVERS_DIR_NAME: &str = "resolvers";
const RESOLVER_FILE_EXTENSION: &str = "vtl";
const SCHEMA_FILE_NAME: &str = "schema.graphql";
const SCHEMA_DIR_NAME: &str = "schema";
const GRAPHQL_FILE_EXTENSION: &str = "graphql";

const EXTERNAL_TABLE_KEY: &str = "rdsClusterIdentifier";

/// Whether the document defines one of the root operation types, which means the API carries
/// resolvers of its own.
///
/// Only definitions count: `extend type Query` does not.
pub fn has_custom_resolver_types(document: &ServiceDocument) -> bool {
    document.definitions.iter().any(|definition| match definition {
        TypeSystemDefinition::Type(type_definition) => {
            let type_definition = &type_definition.node;
            !type_definition.extend
                && matches!(type_definition.kind, TypeKind::Object(_))
                && ROOT_TYPE_NAMES.contains(&type_definition.name.node.as_str())
        }
        _ => false,
    })
}

/// Directive names used in `schema_text` that the migration does not support, plus
/// [`DEPRECATED_CONNECTION_MARKER`] if `@connection` is used with a deprecated argument.
pub fn find_unsupported_directives(schema_text: &str) -> Result<BTreeSet<String>, InspectorError> {
    let document = parse_schema_document(schema_text)?;
    Ok(find_unsupported_directives_in(&document))
}

pub fn find_unsupported_directives_in(document: &ServiceDocument) -> BTreeSet<String> {
    let mut unsupported: BTreeSet<String> = collect_directives_by_type_names(document)
        .into_values()
        .flatten()
        .filter(|name| !SUPPORTED_DIRECTIVES.contains(name))
        .map(str::to_string)
        .collect();

    if !deprecated_connection_arguments(document).is_empty() {
        unsupported.insert(DEPRECATED_CONNECTION_MARKER.to_string());
    }

    unsupported
}

/// Every argument of a `@connection` application that uses the deprecated parameterization.
pub fn deprecated_connection_arguments(document: &ServiceDocument) -> Vec<DeprecatedArgument> {
    collect_directives(document)
        .into_iter()
        .filter(|usage| usage.name() == CONNECTION_DIRECTIVE)
        .flat_map(|usage| {
            usage
                .directive
                .arguments
                .iter()
                .map(|(name, _)| name.node.as_str())
                .filter(|name| DEPRECATED_CONNECTION_ARGUMENTS.contains(name))
                .map(move |argument| DeprecatedArgument {
                    type_name: usage.type_name.unwrap_or_default().to_string(),
                    field_name: usage.field_name.map(str::to_string),
                    directive: CONNECTION_DIRECTIVE.to_string(),
                    argument: argument.to_string(),
                })
        })
        .collect()
}

/// Answers migration questions about the APIs of one project.
pub struct SchemaInspector<'a> {
    paths: &'a PathManager,
    metadata: &'a dyn EnvironmentMetadata,
    flags: &'a dyn FeatureFlags,
}

impl<'a> SchemaInspector<'a> {
    pub fn new(
        paths: &'a PathManager,
        metadata: &'a dyn EnvironmentMetadata,
        flags: &'a dyn FeatureFlags,
    ) -> Self {
        Self {
            paths,
            metadata,
            flags,
        }
    }

    /// Whether the API is backed by an external (relational) table cluster in the current
    /// environment. Any missing piece of metadata means it is not.
    pub fn uses_external_table_backend(&self, api_name: &str) -> bool {
        let Some(env_name) = self.metadata.current_env_name() else {
            return false;
        };

        self.metadata
            .resource_parameters(&env_name, API_CATEGORY, api_name)
            .and_then(|parameters| parameters.get(EXTERNAL_TABLE_KEY).map(is_truthy))
            .unwrap_or(false)
    }

    /// Whether the API's resolver directory contains resolver templates.
    ///
    /// An API without a resolver directory is an error rather than `false`.
    pub fn has_overridden_resolver_files(&self, api_name: &str) -> Result<bool, InspectorError> {
        let resolvers_dir = self.resolvers_dir(api_name);

        let entries = std::fs::read_dir(&resolvers_dir).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                InspectorError::DirectoryMissing(resolvers_dir.clone())
            } else {
                InspectorError::Io {
                    path: resolvers_dir.clone(),
                    source,
                }
            }
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| InspectorError::Io {
                path: resolvers_dir.clone(),
                source,
            })?;
            if has_extension(&entry.path(), RESOLVER_FILE_EXTENSION) {
                return Ok(true);
            }
        }

        Ok(false)
    }

    pub fn is_pluralization_improved(&self) -> bool {
        self.flags.get_boolean(IMPROVE_PLURALIZATION)
    }

    /// Read the API's schema: `schema.graphql`, or else every `.graphql` file of its `schema`
    /// directory in file-name order.
    pub fn read_schema(&self, api_name: &str) -> Result<String, InspectorError> {
        let api_dir = self.api_dir(api_name);
        let schema_file = api_dir.join(SCHEMA_FILE_NAME);

        if schema_file.is_file() {
            return std::fs::read_to_string(&schema_file).map_err(|source| InspectorError::Io {
                path: schema_file,
                source,
            });
        }

        let schema_dir = api_dir.join(SCHEMA_DIR_NAME);
        if !schema_dir.is_dir() {
            return Err(InspectorError::SchemaMissing {
                api_name: api_name.to_string(),
                path: schema_file,
            });
        }

        let io_error = |path: &Path, source: std::io::Error| InspectorError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut files = std::fs::read_dir(&schema_dir)
            .map_err(|e| io_error(&schema_dir, e))?
            .map(|entry| entry.map(|entry| entry.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| io_error(&schema_dir, e))?;
        files.retain(|path| has_extension(path, GRAPHQL_FILE_EXTENSION));
        files.sort();

        if files.is_empty() {
            return Err(InspectorError::SchemaMissing {
                api_name: api_name.to_string(),
                path: schema_dir,
            });
        }

        let mut schema = String::new();
        for file in files {
            let content = std::fs::read_to_string(&file).map_err(|e| io_error(&file, e))?;
            schema.push_str(&content);
            schema.push('\n');
        }

        Ok(schema)
    }

    /// Answer every migration question about an API at once.
    ///
    /// Unlike [`SchemaInspector::has_overridden_resolver_files`], an API without a resolver
    /// directory is reported as having no overridden resolvers.
    pub fn inspect(&self, api_name: &str) -> Result<DirectiveUsageReport, InspectorError> {
        let schema = self.read_schema(api_name)?;
        let document = parse_schema_document(&schema)?;

        let uses_overridden_resolvers = match self.has_overridden_resolver_files(api_name) {
            Ok(found) => found,
            Err(InspectorError::DirectoryMissing(path)) => {
                tracing::debug!("No resolver directory at {}", path.display());
                false
            }
            Err(e) => return Err(e),
        };

        Ok(DirectiveUsageReport {
            unsupported_directives: find_unsupported_directives_in(&document),
            deprecated_arguments: deprecated_connection_arguments(&document),
            uses_custom_resolvers: has_custom_resolver_types(&document),
            uses_overridden_resolvers,
            uses_external_table_backend: self.uses_external_table_backend(api_name),
            improved_pluralization: self.is_pluralization_improved(),
        })
    }

    fn api_dir(&self, api_name: &str) -> PathBuf {
        self.paths.resource_dir(API_CATEGORY, api_name)
    }

    fn resolvers_dir(&self, api_name: &str) -> PathBuf {
        self.api_dir(api_name).join(RESOLVERS_DIR_NAME)
    }
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().is_some_and(|ext| ext == extension)
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}
