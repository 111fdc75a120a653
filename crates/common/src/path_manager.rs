// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use thiserror::Error;

pub const PROJECT_DIR_NAME: &str = "amplify";
pub const BACKEND_DIR_NAME: &str = "backend";
pub const DOT_CONFIG_DIR_NAME: &str = ".config";

pub const TEAM_PROVIDER_INFO_FILE_NAME: &str = "team-provider-info.json";
pub const LOCAL_ENV_INFO_FILE_NAME: &str = "local-env-info.json";
pub const CLI_JSON_FILE_NAME: &str = "cli.json";
pub const BACKEND_CONFIG_FILE_NAME: &str = "backend-config.json";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(
        "No project found in '{0}' or any of its parent directories. Expected a '{PROJECT_DIR_NAME}' directory."
    )]
    NotFound(PathBuf),

    #[error("Failed to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Resolves the well-known locations inside a project.
///
/// Nothing here touches the file system except [`PathManager::find_from`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathManager {
    project_root: PathBuf,
}

impl PathManager {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }

    /// Walk up from `start` to the nearest directory containing the project directory.
    pub fn find_from(start: &Path) -> Result<Self, ProjectError> {
        start
            .ancestors()
            .find(|dir| dir.join(PROJECT_DIR_NAME).is_dir())
            .map(Self::new)
            .ok_or_else(|| ProjectError::NotFound(start.to_path_buf()))
    }

    pub fn from_current_dir() -> Result<Self, ProjectError> {
        let cwd = std::env::current_dir().map_err(ProjectError::CurrentDir)?;
        Self::find_from(&cwd)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn project_dir(&self) -> PathBuf {
        self.project_root.join(PROJECT_DIR_NAME)
    }

    pub fn backend_dir(&self) -> PathBuf {
        self.project_dir().join(BACKEND_DIR_NAME)
    }

    pub fn dot_config_dir(&self) -> PathBuf {
        self.project_dir().join(DOT_CONFIG_DIR_NAME)
    }

    pub fn resource_dir(&self, category: &str, resource_name: &str) -> PathBuf {
        self.backend_dir().join(category).join(resource_name)
    }

    pub fn team_provider_info_path(&self) -> PathBuf {
        self.project_dir().join(TEAM_PROVIDER_INFO_FILE_NAME)
    }

    pub fn local_env_info_path(&self) -> PathBuf {
        self.dot_config_dir().join(LOCAL_ENV_INFO_FILE_NAME)
    }

    pub fn cli_json_path(&self) -> PathBuf {
        self.project_dir().join(CLI_JSON_FILE_NAME)
    }

    pub fn backend_config_path(&self) -> PathBuf {
        self.backend_dir().join(BACKEND_CONFIG_FILE_NAME)
    }
}
