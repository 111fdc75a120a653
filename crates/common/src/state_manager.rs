// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Deserialize;
use serde_json::Value;

use crate::{
    json_util::{JsonFileError, read_json_if_exists},
    path_manager::PathManager,
};

/// Environment-scoped metadata about the resources of a project.
pub trait EnvironmentMetadata {
    /// The name of the environment the project is currently checked out in.
    fn current_env_name(&self) -> Option<String>;

    /// Per-environment parameters recorded for a resource, e.g. `categories.api.<name>` of the
    /// team provider info.
    fn resource_parameters(&self, env_name: &str, category: &str, resource_name: &str)
    -> Option<Value>;
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LocalEnvInfo {
    env_name: Option<String>,
}

/// [`EnvironmentMetadata`] backed by the project's `local-env-info.json` and
/// `team-provider-info.json`.
///
/// Missing or unreadable files are reported as absent metadata; they are optional in a project.
pub struct StateManager {
    paths: PathManager,
}

impl StateManager {
    pub fn new(paths: PathManager) -> Self {
        Self { paths }
    }

    pub fn team_provider_info(&self) -> Result<Option<Value>, JsonFileError> {
        read_json_if_exists(&self.paths.team_provider_info_path())
    }

    pub fn local_env_name(&self) -> Result<Option<String>, JsonFileError> {
        let info: Option<LocalEnvInfo> = read_json_if_exists(&self.paths.local_env_info_path())?;
        Ok(info.and_then(|info| info.env_name))
    }
}

impl EnvironmentMetadata for StateManager {
    fn current_env_name(&self) -> Option<String> {
        self.local_env_name()
            .inspect_err(|e| tracing::warn!("Ignoring local environment info: {e}"))
            .ok()
            .flatten()
    }

    fn resource_parameters(
        &self,
        env_name: &str,
        category: &str,
        resource_name: &str,
    ) -> Option<Value> {
        let team_provider_info = self
            .team_provider_info()
            .inspect_err(|e| tracing::warn!("Ignoring team provider info: {e}"))
            .ok()
            .flatten()?;

        team_provider_info
            .get(env_name)?
            .get("categories")?
            .get(category)?
            .get(resource_name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::ProjectFixture;

    #[test]
    fn reads_env_and_resource_parameters() {
        let project = ProjectFixture::new();
        project.write_json(
            "amplify/.config/local-env-info.json",
            &json!({"envName": "dev", "projectPath": "/tmp/x"}),
        );
        project.write_json(
            "amplify/team-provider-info.json",
            &json!({
                "dev": {
                    "awscloudformation": {"Region": "us-east-1"},
                    "categories": {"api": {"notesapi": {"rdsClusterIdentifier": "cluster-1"}}}
                }
            }),
        );

        let state = StateManager::new(project.paths());

        assert_eq!(state.current_env_name().as_deref(), Some("dev"));
        assert_eq!(
            state.resource_parameters("dev", "api", "notesapi"),
            Some(json!({"rdsClusterIdentifier": "cluster-1"}))
        );
        assert_eq!(state.resource_parameters("prod", "api", "notesapi"), None);
        assert_eq!(state.resource_parameters("dev", "api", "other"), None);
    }

    #[test]
    fn absent_files_are_absent_metadata() {
        let project = ProjectFixture::new();
        let state = StateManager::new(project.paths());

        assert_eq!(state.current_env_name(), None);
        assert_eq!(state.resource_parameters("dev", "api", "notesapi"), None);
    }

    #[test]
    fn malformed_files_are_absent_metadata() {
        let project = ProjectFixture::new();
        project.write_raw("amplify/team-provider-info.json", "{");

        let state = StateManager::new(project.paths());

        assert!(state.team_provider_info().is_err());
        assert_eq!(state.resource_parameters("dev", "api", "notesapi"), None);
    }
}
