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
use common::{backend_config::BackendConfig, path_manager::PathManager};
use dynamodb_input_state::{DynamoDbInputState, MigrationReport, STORAGE_CATEGORY};
use project_env::Environment;

use crate::{
    commands::command::{CommandDefinition, get, resource_name_arg},
    config::Config,
    util::print,
};

pub(super) struct MigrateCommandDefinition {}

#[async_trait]
impl CommandDefinition for MigrateCommandDefinition {
    fn command(&self) -> Command {
        Command::new("migrate")
            .about("Move storage resources created by older tooling to cli-inputs.json")
            .long_about("Fold the parameters, CloudFormation template and storage params files of a storage resource into cli-inputs.json. Without a resource name, every storage resource that still has legacy files is migrated.")
            .arg(resource_name_arg(false))
    }

    async fn execute(
        &self,
        matches: &ArgMatches,
        _config: &Config,
        _env: Arc<dyn Environment>,
    ) -> Result<()> {
        let paths = PathManager::from_current_dir()?;
        let resource: Option<String> = get(matches, "resource");

        let resource_names = match resource {
            Some(resource) => vec![resource],
            None => legacy_resources(&paths)?,
        };

        if resource_names.is_empty() {
            print::info("No storage resources need to be migrated");
            return Ok(());
        }

        for resource_name in resource_names {
            let state = DynamoDbInputState::new(&paths, &resource_name);

            match state.migrate_if_needed()? {
                Some(report) => print_report(&resource_name, &report),
                None => print::info(&format!(
                    "{resource_name} already uses {}",
                    state.cli_inputs_file_path().display()
                )),
            }
        }

        Ok(())
    }
}

/// Storage resources registered in the project that still carry legacy files.
fn legacy_resources(paths: &PathManager) -> Result<Vec<String>> {
    let backend_config = BackendConfig::load(paths)?;

    Ok(backend_config
        .resource_names(STORAGE_CATEGORY)
        .into_iter()
        .filter(|name| {
            let state = DynamoDbInputState::new(paths, name);
            !state.canonical_config_exists() && state.legacy_sources_exist()
        })
        .collect())
}

fn print_report(resource_name: &str, report: &MigrationReport) {
    print::success(&format!("Migrated {resource_name} to cli-inputs.json"));

    if !report.unmapped_type_codes.is_empty() {
        print::warning(&format!(
            "Attribute types {} have no equivalent and were migrated without a type",
            report.unmapped_type_codes.join(", ")
        ));
    }

    for failure in &report.cleanup_failures {
        print::warning(&format!(
            "Could not remove {}: {}",
            failure.path.display(),
            failure.error
        ));
    }
}
