// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::{
    path::Path,
    process::{Command, Output, Stdio},
};

use common::test_support::ProjectFixture;
use serde_json::{Value, json};

fn amp<I>(cwd: impl AsRef<Path>, args: I) -> Output
where
    I: IntoIterator<Item = &'static str>,
{
    let bin = env!("CARGO_BIN_EXE_amp");

    Command::new(bin)
        .current_dir(cwd)
        .args(args)
        .env_remove("AMP_FEATURE_GRAPHQLTRANSFORMER_IMPROVEPLURALIZATION")
        .stdin(Stdio::null())
        .output()
        .expect("Failed to run amp")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn legacy_project() -> ProjectFixture {
    let project = ProjectFixture::new();
    project.write_json(
        "amplify/backend/backend-config.json",
        &json!({"storage": {"notes": {"service": "DynamoDB", "providerPlugin": "awscloudformation"}}}),
    );
    project.write_json(
        "amplify/backend/storage/notes/parameters.json",
        &json!({"tableName": "notes", "partitionKeyName": "id", "partitionKeyType": "S"}),
    );
    project.write_json(
        "amplify/backend/storage/notes/notes-cloudformation-template.json",
        &json!({
            "Resources": {
                "DynamoDBTable": {
                    "Properties": {
                        "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}]
                    }
                }
            }
        }),
    );
    project
}

#[test]
fn storage_migrate_and_show() {
    let project = legacy_project();

    let output = amp(project.root(), ["storage", "migrate"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("Migrated notes to cli-inputs.json"));
    assert!(project.exists("amplify/backend/storage/notes/cli-inputs.json"));
    assert!(!project.exists("amplify/backend/storage/notes/parameters.json"));

    let output = amp(project.root(), ["storage", "migrate", "notes"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("notes already uses"));

    let output = amp(project.root(), ["storage", "show", "notes"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let shown: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        shown,
        json!({
            "resourceName": "notes",
            "tableName": "notes",
            "partitionKey": {"fieldName": "id", "fieldType": "string"},
            "triggerFunctions": [],
            "gsi": []
        })
    );
}

#[test]
fn storage_show_unknown_resource_fails() {
    let project = ProjectFixture::new();

    let output = amp(project.root(), ["storage", "show", "missing"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("missing"));
}

#[test]
fn api_inspect_json() {
    let project = ProjectFixture::new();
    project.write_raw(
        "amplify/backend/api/blog/schema.graphql",
        r#"
            type Post @model @versioned {
              id: ID!
              comments: [Comment] @connection(name: "PostComments")
            }

            type Comment @model {
              id: ID!
            }
        "#,
    );
    project.write_json(
        "amplify/cli.json",
        &json!({"features": {"graphqltransformer": {"improvepluralization": true}}}),
    );

    let output = amp(project.root(), ["api", "inspect", "blog", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        report["unsupportedDirectives"],
        json!(["Deprecated parameterization of @connection", "versioned"])
    );
    assert_eq!(report["usesCustomResolvers"], json!(false));
    assert_eq!(report["usesOverriddenResolvers"], json!(false));
    assert_eq!(report["improvedPluralization"], json!(true));
    assert_eq!(report["deprecatedArguments"][0]["argument"], json!("name"));
}

#[test]
fn outside_a_project_fails() {
    let dir = tempfile::tempdir().unwrap();

    let output = amp(dir.path(), ["storage", "show", "notes"]);

    assert!(!output.status.success());
}
