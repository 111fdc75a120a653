// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use anyhow::Result;
use common::logging_tracing;
use project_env::{Environment, SystemEnvironment};

use commands::{
    api,
    command::{CommandDefinition, SubcommandDefinition},
    storage,
};
use provider::ProviderRegistry;

mod commands;
mod config;
mod prompt;
mod provider;
mod util;

#[tokio::main]
async fn main() -> Result<()> {
    logging_tracing::init()?;

    let registry = Arc::new(ProviderRegistry::with_builtin_providers());

    let subcommand_definition = SubcommandDefinition::new(
        "amp",
        "Manage storage resources and inspect GraphQL APIs of an Amplify project",
        vec![
            Box::new(storage::command_definition(registry)),
            Box::new(api::command_definition()),
        ],
    );

    let command = subcommand_definition
        .command()
        .version(env!("CARGO_PKG_VERSION"));

    let matches = command.get_matches();

    let config = config::load_config()?;
    let env: Arc<dyn Environment> = Arc::new(SystemEnvironment);

    subcommand_definition.execute(&matches, &config, env).await
}
