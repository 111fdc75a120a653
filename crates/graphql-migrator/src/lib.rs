// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Inspection of an API's GraphQL schema ahead of a transformer migration: which features does
//! the schema (and the API's resource directory) use that an automatic migration cannot carry
//! over?

mod directives;
mod error;
mod inspector;
mod report;

pub use directives::{
    DirectiveUsage, collect_directives, collect_directives_by_type_names, parse_schema_document,
};
pub use error::InspectorError;
pub use inspector::{
    DEPRECATED_CONNECTION_MARKER, SchemaInspector, SUPPORTED_DIRECTIVES,
    deprecated_connection_arguments, find_unsupported_directives,
    find_unsupported_directives_in, has_custom_resolver_types,
};
pub use report::{DeprecatedArgument, DirectiveUsageReport};

pub const API_CATEGORY: &str = "api";
