// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use clap::{ArgMatches, Command};
use common::path_manager::PathManager;
use dynamodb_input_state::STORAGE_CATEGORY;
use project_env::Environment;

use crate::{
    commands::command::CommandDefinition,
    config::{Config, StorageConfig},
    prompt::{InquirePrompter, Prompter},
    provider::{AddResourceOptions, ProviderRegistry, ServiceMetadata, supported_services},
    util::print,
};

pub(super) struct AddCommandDefinition {
    pub registry: Arc<ProviderRegistry>,
}

#[async_trait]
impl CommandDefinition for AddCommandDefinition {
    fn command(&self) -> Command {
        Command::new("add").about("Add a storage resource to the project")
    }

    async fn execute(
        &self,
        _matches: &ArgMatches,
        config: &Config,
        _env: Arc<dyn Environment>,
    ) -> Result<()> {
        let paths = PathManager::from_current_dir()?;

        let result = add_resource(
            &self.registry,
            &InquirePrompter,
            &paths,
            &config.storage,
            supported_services(),
        );

        match result {
            Ok(Some(resource_name)) => {
                print_next_steps(&resource_name);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                print::error(&err.to_string());
                tracing::debug!("{err:?}");
                Err(anyhow!("An error occurred when adding the storage resource"))
            }
        }
    }
}

/// Choose a service, then hand over to its provider. `None` when no provider is registered for
/// the chosen service.
fn add_resource(
    registry: &ProviderRegistry,
    prompter: &dyn Prompter,
    paths: &PathManager,
    storage_config: &StorageConfig,
    services: &[ServiceMetadata],
) -> Result<Option<String>> {
    let selected = select_service(prompter, services, storage_config.default_service.as_deref())?;

    let options = AddResourceOptions {
        service: selected.service.to_string(),
        provider_plugin: selected.provider.to_string(),
    };

    let Some(provisioner) = registry.get(&options.provider_plugin) else {
        print::error("Provider not configured for this category");
        return Ok(None);
    };

    provisioner
        .add_resource(prompter, paths, STORAGE_CATEGORY, &options)
        .map(Some)
}

fn select_service(
    prompter: &dyn Prompter,
    services: &[ServiceMetadata],
    default_service: Option<&str>,
) -> Result<ServiceMetadata> {
    let preselected = default_service
        .and_then(|default| services.iter().find(|metadata| metadata.service == default));

    let selected = match (preselected, services) {
        (Some(metadata), _) | (None, [metadata]) => *metadata,
        (None, []) => return Err(anyhow!("No storage services are available")),
        (None, _) => {
            let labels: Vec<String> = services
                .iter()
                .map(|metadata| metadata.service.to_string())
                .collect();
            let index = prompter.select("Select from one of the below mentioned services:", &labels, None)?;
            return Ok(services[index]);
        }
    };

    print::info(&format!(
        "Using service: {}, provided by: {}",
        selected.service, selected.provider
    ));
    Ok(selected)
}

/// Follow-up commands for a new resource, each with what it does.
fn next_steps(resource_name: &str) -> Vec<(String, &'static str)> {
    vec![(
        format!("amp storage show {resource_name}"),
        "validates the saved configuration and prints it",
    )]
}

fn print_next_steps(resource_name: &str) {
    print::success(&format!("Successfully added resource {resource_name} locally"));
    print::info("");
    print::success("Some next steps:");
    for (command, description) in next_steps(resource_name) {
        print::info(&format!("\"{command}\" {description}"));
    }
    print::info("");
}

#[cfg(test)]
mod tests {
    use common::test_support::ProjectFixture;

    use crate::{
        prompt::{Answer, PredefinedPrompter},
        provider::AWS_CLOUDFORMATION_PROVIDER,
    };

    use super::*;

    const SERVICES: &[ServiceMetadata] = &[
        ServiceMetadata {
            service: "DynamoDB",
            provider: AWS_CLOUDFORMATION_PROVIDER,
        },
        ServiceMetadata {
            service: "S3",
            provider: "awss3",
        },
    ];

    fn dynamodb_answers() -> Vec<Answer> {
        vec![
            Answer::text("items"),
            Answer::Default,
            Answer::text("id"),
            Answer::select("string"),
            Answer::Confirm(false),
            Answer::select("id"),
            Answer::Confirm(false),
            Answer::Confirm(false),
            Answer::Confirm(false),
        ]
    }

    #[test]
    fn single_service_is_used_without_asking() {
        let fixture = ProjectFixture::new();
        let prompter = PredefinedPrompter::new(dynamodb_answers());

        let result = add_resource(
            &ProviderRegistry::with_builtin_providers(),
            &prompter,
            &fixture.paths(),
            &StorageConfig::default(),
            supported_services(),
        )
        .unwrap();

        assert_eq!(result.as_deref(), Some("items"));
        assert_eq!(prompter.remaining(), 0);
        assert!(fixture.exists("amplify/backend/storage/items/cli-inputs.json"));
    }

    #[test]
    fn service_is_selected_when_several_are_available() {
        let fixture = ProjectFixture::new();
        let mut answers = vec![Answer::select("DynamoDB")];
        answers.extend(dynamodb_answers());
        let prompter = PredefinedPrompter::new(answers);

        let result = add_resource(
            &ProviderRegistry::with_builtin_providers(),
            &prompter,
            &fixture.paths(),
            &StorageConfig::default(),
            SERVICES,
        )
        .unwrap();

        assert_eq!(result.as_deref(), Some("items"));
    }

    #[test]
    fn default_service_skips_selection() {
        let fixture = ProjectFixture::new();
        let prompter = PredefinedPrompter::new(dynamodb_answers());
        let storage_config = StorageConfig {
            default_service: Some("DynamoDB".to_string()),
        };

        let result = add_resource(
            &ProviderRegistry::with_builtin_providers(),
            &prompter,
            &fixture.paths(),
            &storage_config,
            SERVICES,
        )
        .unwrap();

        assert_eq!(result.as_deref(), Some("items"));
        assert_eq!(prompter.remaining(), 0);
    }

    #[test]
    fn unknown_provider_adds_nothing() {
        let fixture = ProjectFixture::new();
        let prompter = PredefinedPrompter::new(vec![Answer::select("S3")]);

        let result = add_resource(
            &ProviderRegistry::with_builtin_providers(),
            &prompter,
            &fixture.paths(),
            &StorageConfig::default(),
            SERVICES,
        )
        .unwrap();

        assert_eq!(result, None);
        assert!(!fixture.exists("amplify/backend/backend-config.json"));
    }

    #[test]
    fn provisioner_errors_are_returned() {
        let fixture = ProjectFixture::new();
        let prompter = PredefinedPrompter::new(vec![]);

        let result = add_resource(
            &ProviderRegistry::with_builtin_providers(),
            &prompter,
            &fixture.paths(),
            &StorageConfig::default(),
            supported_services(),
        );

        assert!(result.is_err());
        assert!(!fixture.exists("amplify/backend/backend-config.json"));
    }

    #[test]
    fn next_steps_are_valid_commands() {
        let amp = Command::new("amp").subcommand(
            crate::commands::storage::command_definition(Arc::new(
                ProviderRegistry::with_builtin_providers(),
            ))
            .command(),
        );

        let steps = next_steps("items");
        assert!(!steps.is_empty());

        for (command, _) in steps {
            let args = command.split_whitespace();
            assert!(
                amp.clone().try_get_matches_from(args).is_ok(),
                "`{command}` is not a command"
            );
        }
    }
}
