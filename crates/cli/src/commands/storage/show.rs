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
use async_trait::async_trait;
use clap::{ArgMatches, Command};
use common::path_manager::PathManager;
use dynamodb_input_state::DynamoDbInputState;
use project_env::Environment;

use crate::{
    commands::command::{CommandDefinition, get_required, resource_name_arg},
    config::Config,
};

pub(super) struct ShowCommandDefinition {}

#[async_trait]
impl CommandDefinition for ShowCommandDefinition {
    fn command(&self) -> Command {
        Command::new("show")
            .about("Validate and print the configuration of a storage resource")
            .arg(resource_name_arg(true))
    }

    async fn execute(
        &self,
        matches: &ArgMatches,
        _config: &Config,
        _env: Arc<dyn Environment>,
    ) -> Result<()> {
        let paths = PathManager::from_current_dir()?;
        let resource: String = get_required(matches, "resource")?;

        let config = DynamoDbInputState::new(&paths, &resource).validate_stored()?;

        println!("{}", serde_json::to_string_pretty(&config)?);

        Ok(())
    }
}
