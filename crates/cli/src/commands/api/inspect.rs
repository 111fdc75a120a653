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
use common::{
    feature_flags::ProjectFeatureFlags, path_manager::PathManager, state_manager::StateManager,
};
use graphql_migrator::{DirectiveUsageReport, SchemaInspector};
use project_env::Environment;

use crate::{
    commands::command::{CommandDefinition, api_name_arg, get_required, json_arg},
    config::Config,
    util::print,
};

pub(super) struct InspectCommandDefinition {}

#[async_trait]
impl CommandDefinition for InspectCommandDefinition {
    fn command(&self) -> Command {
        Command::new("inspect")
            .about("Report the directives and features of an API that affect a transformer migration")
            .arg(api_name_arg())
            .arg(json_arg())
    }

    async fn execute(
        &self,
        matches: &ArgMatches,
        _config: &Config,
        env: Arc<dyn Environment>,
    ) -> Result<()> {
        let api_name: String = get_required(matches, "api")?;
        let json: bool = matches.get_flag("json");

        let paths = PathManager::from_current_dir()?;
        let flags = ProjectFeatureFlags::load(&paths, env)?;
        let state = StateManager::new(paths.clone());

        let report = SchemaInspector::new(&paths, &state, &flags).inspect(&api_name)?;

        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&api_name, &report);
        }

        Ok(())
    }
}

fn print_report(api_name: &str, report: &DirectiveUsageReport) {
    print::info(&format!("API: {api_name}"));

    if report.unsupported_directives.is_empty() {
        print::info("Unsupported directives: none");
    } else {
        let names: Vec<&str> = report
            .unsupported_directives
            .iter()
            .map(String::as_str)
            .collect();
        print::info(&format!("Unsupported directives: {}", names.join(", ")));
    }

    for argument in &report.deprecated_arguments {
        let location = match &argument.field_name {
            Some(field_name) => format!("{}.{}", argument.type_name, field_name),
            None => argument.type_name.clone(),
        };
        print::warning(&format!(
            "Deprecated argument `{}` of @{} on {}",
            argument.argument, argument.directive, location
        ));
    }

    print::info(&format!("Custom resolvers: {}", report.uses_custom_resolvers));
    print::info(&format!(
        "Overridden resolvers: {}",
        report.uses_overridden_resolvers
    ));
    print::info(&format!(
        "External table backend: {}",
        report.uses_external_table_backend
    ));
    print::info(&format!(
        "Improved pluralization: {}",
        report.improved_pluralization
    ));
    print::info("");

    let blockers = report.blockers();
    if blockers.is_empty() {
        print::success("The API can be migrated");
    } else {
        print::warning("The API cannot be migrated automatically:");
        for blocker in blockers {
            print::warning(&format!("  - {blocker}"));
        }
    }
}
