// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InspectorError {
    #[error("Directory {} does not exist", .0.display())]
    DirectoryMissing(PathBuf),

    #[error("No GraphQL schema found for API '{api_name}' (looked for {})", path.display())]
    SchemaMissing { api_name: String, path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse GraphQL schema: {0}")]
    Parse(#[source] async_graphql_parser::Error),
}
