// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::LazyLock;

use anyhow::{Result, bail};
use common::{
    backend_config::{BackendConfig, ResourceEntry},
    path_manager::PathManager,
};
use dynamodb_input_state::{
    AttributeType, DynamoDbInputState, IndexDescriptor, KeyDescriptor, ResourceInputConfig,
    STORAGE_CATEGORY,
};
use regex::Regex;

use crate::{prompt::Prompter, util::print};

use super::AddResourceOptions;

static RESOURCE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9]+$").unwrap());
static TABLE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9._-]+$").unwrap());
static COLUMN_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-zA-Z0-9_-]+$").unwrap());

const TABLE_NAME_LENGTH: std::ops::RangeInclusive<usize> = 3..=255;

struct Column {
    name: String,
    attribute_type: AttributeType,
}

impl Column {
    fn key(&self) -> KeyDescriptor {
        KeyDescriptor::new(&self.name, Some(self.attribute_type))
    }
}

pub(super) fn add_walkthrough(
    prompter: &dyn Prompter,
    paths: &PathManager,
    options: &AddResourceOptions,
) -> Result<String> {
    let mut backend_config = BackendConfig::load(paths)?;

    print::info("Welcome to the NoSQL DynamoDB database wizard");
    print::info("This wizard asks you a series of questions to help determine how to set up your NoSQL database table.");
    print::info("");

    let default_resource_name = default_resource_name();
    let resource_name = ask_valid(
        prompter,
        "Provide a friendly name",
        Some(default_resource_name.as_str()),
        |name| {
            if !RESOURCE_NAME_PATTERN.is_match(name) {
                Err("Resource name should be alphanumeric".to_string())
            } else if backend_config.contains(STORAGE_CATEGORY, name) {
                Err(format!("A storage resource named {name} already exists"))
            } else {
                Ok(())
            }
        },
    )?;

    let table_name = ask_valid(
        prompter,
        "Provide table name",
        Some(resource_name.as_str()),
        |name| {
            if !TABLE_NAME_PATTERN.is_match(name) || !TABLE_NAME_LENGTH.contains(&name.len()) {
                Err("Table names may contain letters, digits, '.', '_' and '-', and must be between 3 and 255 characters long".to_string())
            } else {
                Ok(())
            }
        },
    )?;

    print::info("");
    print::info("You can now add columns to the table.");

    let columns = ask_columns(prompter)?;

    let key_columns: Vec<&Column> = columns
        .iter()
        .filter(|column| column.attribute_type.is_key_type())
        .collect();
    if key_columns.is_empty() {
        bail!("At least one column of type string, number or binary is required for the partition key");
    }

    let partition_key = select_column(prompter, "Choose partition key for the table", &key_columns)?;

    let sort_key = if prompter.confirm("Do you want to add a sort key to your table?", false)? {
        ask_sort_key(prompter, "Choose sort key for the table", &key_columns, partition_key)?
    } else {
        None
    };

    let mut gsi: Vec<IndexDescriptor> = vec![];
    if prompter.confirm(
        "Do you want to add global secondary indexes to your table?",
        false,
    )? {
        loop {
            gsi.push(ask_index(prompter, &key_columns, &gsi)?);

            if !prompter.confirm(
                "Do you want to add more global secondary indexes to your table?",
                false,
            )? {
                break;
            }
        }
    }

    let mut trigger_functions = vec![];
    if prompter.confirm("Do you want to add a Lambda Trigger for your Table?", false)? {
        let default_function_name = format!("{resource_name}Trigger");
        let function_name = ask_valid(
            prompter,
            "Provide the name of the trigger function",
            Some(default_function_name.as_str()),
            |name| {
                if RESOURCE_NAME_PATTERN.is_match(name) {
                    Ok(())
                } else {
                    Err("Function name should be alphanumeric".to_string())
                }
            },
        )?;
        trigger_functions.push(function_name);
    }

    let config = ResourceInputConfig {
        resource_name: resource_name.clone(),
        table_name,
        partition_key: partition_key.key(),
        sort_key: sort_key.map(Column::key),
        trigger_functions,
        gsi,
    };

    DynamoDbInputState::new(paths, &resource_name).save(&config)?;

    backend_config.add_resource(
        STORAGE_CATEGORY,
        &resource_name,
        &ResourceEntry {
            service: options.service.clone(),
            provider_plugin: options.provider_plugin.clone(),
        },
    );
    backend_config.save()?;

    Ok(resource_name)
}

fn default_resource_name() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("dynamo{}", &suffix[..8])
}

fn ask_columns(prompter: &dyn Prompter) -> Result<Vec<Column>> {
    let type_labels: Vec<String> = AttributeType::ALL
        .iter()
        .map(|attribute_type| attribute_type.to_string())
        .collect();

    let mut columns: Vec<Column> = vec![];

    loop {
        let name = ask_valid(
            prompter,
            "What would you like to name this column",
            None,
            |name| {
                if !COLUMN_NAME_PATTERN.is_match(name) {
                    Err("Column names may contain letters, digits, '_' and '-'".to_string())
                } else if columns.iter().any(|column| column.name == name) {
                    Err(format!("Column {name} has already been added"))
                } else {
                    Ok(())
                }
            },
        )?;

        let type_index = prompter.select("Choose the data type", &type_labels, Some(0))?;

        columns.push(Column {
            name,
            attribute_type: AttributeType::ALL[type_index],
        });

        if !prompter.confirm("Would you like to add another column?", true)? {
            return Ok(columns);
        }
    }
}

fn ask_index(
    prompter: &dyn Prompter,
    key_columns: &[&Column],
    existing: &[IndexDescriptor],
) -> Result<IndexDescriptor> {
    let name = ask_valid(
        prompter,
        "Provide the GSI name",
        None,
        |name| {
            if !TABLE_NAME_PATTERN.is_match(name) {
                Err("Index names may contain letters, digits, '.', '_' and '-'".to_string())
            } else if existing.iter().any(|index| index.name == name) {
                Err(format!("Index {name} has already been added"))
            } else {
                Ok(())
            }
        },
    )?;

    let partition_key = select_column(prompter, "Choose partition key for the GSI", key_columns)?;

    let sort_key = if prompter.confirm("Do you want to add a sort key to your global secondary index?", false)? {
        ask_sort_key(prompter, "Choose sort key for the GSI", key_columns, partition_key)?
    } else {
        None
    };

    Ok(IndexDescriptor {
        name,
        partition_key: partition_key.key(),
        sort_key: sort_key.map(Column::key),
    })
}

fn ask_sort_key<'a>(
    prompter: &dyn Prompter,
    message: &str,
    key_columns: &[&'a Column],
    partition_key: &Column,
) -> Result<Option<&'a Column>> {
    let candidates: Vec<&Column> = key_columns
        .iter()
        .copied()
        .filter(|column| column.name != partition_key.name)
        .collect();

    if candidates.is_empty() {
        print::warning("There are no other columns that can be used as a sort key");
        return Ok(None);
    }

    select_column(prompter, message, &candidates).map(Some)
}

fn select_column<'a>(
    prompter: &dyn Prompter,
    message: &str,
    columns: &[&'a Column],
) -> Result<&'a Column> {
    let labels: Vec<String> = columns.iter().map(|column| column.name.clone()).collect();
    let index = prompter.select(message, &labels, None)?;
    Ok(columns[index])
}

/// Ask until the answer passes `validate`, printing the reason for every rejected answer.
fn ask_valid(
    prompter: &dyn Prompter,
    message: &str,
    default: Option<&str>,
    validate: impl Fn(&str) -> Result<(), String>,
) -> Result<String> {
    loop {
        let answer = prompter.text(message, default)?;
        let answer = answer.trim();

        match validate(answer) {
            Ok(()) => return Ok(answer.to_string()),
            Err(reason) => print::warning(&reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use common::test_support::ProjectFixture;
    use serde_json::{Value, json};

    use crate::{
        prompt::{Answer, PredefinedPrompter},
        provider::AWS_CLOUDFORMATION_PROVIDER,
    };

    use super::*;

    fn options() -> AddResourceOptions {
        AddResourceOptions {
            service: "DynamoDB".to_string(),
            provider_plugin: AWS_CLOUDFORMATION_PROVIDER.to_string(),
        }
    }

    fn read_json(fixture: &ProjectFixture, relative: &str) -> Value {
        let content = std::fs::read_to_string(fixture.path(relative)).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn adds_table_with_sort_key_index_and_trigger() {
        let fixture = ProjectFixture::new();
        let prompter = PredefinedPrompter::new(vec![
            Answer::text("notes"),
            Answer::text("notes-table"),
            Answer::text("id"),
            Answer::select("string"),
            Answer::Confirm(true),
            Answer::text("owner"),
            Answer::select("string"),
            Answer::Confirm(true),
            Answer::text("createdAt"),
            Answer::select("number"),
            Answer::Confirm(true),
            Answer::text("tags"),
            Answer::select("string-set"),
            Answer::Confirm(false),
            Answer::select("id"),
            Answer::Confirm(true),
            Answer::select("createdAt"),
            Answer::Confirm(true),
            Answer::text("byOwner"),
            Answer::select("owner"),
            Answer::Confirm(true),
            Answer::select("createdAt"),
            Answer::Confirm(false),
            Answer::Confirm(true),
            Answer::Default,
        ]);

        let name = add_walkthrough(&prompter, &fixture.paths(), &options()).unwrap();

        assert_eq!(name, "notes");
        assert_eq!(prompter.remaining(), 0);
        assert_eq!(
            read_json(&fixture, "amplify/backend/storage/notes/cli-inputs.json"),
            json!({
                "resourceName": "notes",
                "tableName": "notes-table",
                "partitionKey": {"fieldName": "id", "fieldType": "string"},
                "sortKey": {"fieldName": "createdAt", "fieldType": "number"},
                "triggerFunctions": ["notesTrigger"],
                "gsi": [{
                    "name": "byOwner",
                    "partitionKey": {"fieldName": "owner", "fieldType": "string"},
                    "sortKey": {"fieldName": "createdAt", "fieldType": "number"}
                }]
            })
        );
        assert_eq!(
            read_json(&fixture, "amplify/backend/backend-config.json"),
            json!({
                "storage": {
                    "notes": {"service": "DynamoDB", "providerPlugin": "awscloudformation"}
                }
            })
        );
    }

    #[test]
    fn invalid_answers_are_asked_again() {
        let fixture = ProjectFixture::new();
        fixture.write_json(
            "amplify/backend/backend-config.json",
            &json!({"storage": {"taken": {"service": "DynamoDB", "providerPlugin": "awscloudformation"}}}),
        );

        let prompter = PredefinedPrompter::new(vec![
            Answer::text("not valid!"),
            Answer::text("taken"),
            Answer::text("fresh"),
            Answer::text("ab"),
            Answer::Default,
            Answer::text("pk"),
            Answer::select("binary"),
            Answer::Confirm(true),
            Answer::text("pk"),
            Answer::text("flag"),
            Answer::select("boolean"),
            Answer::Confirm(false),
            Answer::select("pk"),
            Answer::Confirm(true),
            Answer::Confirm(false),
            Answer::Confirm(false),
        ]);

        let name = add_walkthrough(&prompter, &fixture.paths(), &options()).unwrap();

        assert_eq!(name, "fresh");
        assert_eq!(prompter.remaining(), 0);
        assert_eq!(
            read_json(&fixture, "amplify/backend/storage/fresh/cli-inputs.json"),
            json!({
                "resourceName": "fresh",
                "tableName": "fresh",
                "partitionKey": {"fieldName": "pk", "fieldType": "binary"},
                "triggerFunctions": [],
                "gsi": []
            })
        );

        let backend_config = read_json(&fixture, "amplify/backend/backend-config.json");
        assert!(backend_config["storage"]["taken"].is_object());
        assert!(backend_config["storage"]["fresh"].is_object());
    }

    #[test]
    fn partition_key_requires_key_typed_column() {
        let fixture = ProjectFixture::new();
        let prompter = PredefinedPrompter::new(vec![
            Answer::text("flags"),
            Answer::Default,
            Answer::text("enabled"),
            Answer::select("boolean"),
            Answer::Confirm(false),
        ]);

        let err = add_walkthrough(&prompter, &fixture.paths(), &options()).unwrap_err();

        assert!(err.to_string().contains("partition key"));
        assert!(!fixture.exists("amplify/backend/storage/flags/cli-inputs.json"));
        assert!(!fixture.exists("amplify/backend/backend-config.json"));
    }

    #[test]
    fn default_resource_names_are_alphanumeric() {
        let name = default_resource_name();
        assert!(name.starts_with("dynamo"));
        assert_eq!(name.len(), 14);
        assert!(RESOURCE_NAME_PATTERN.is_match(&name));
    }
}
