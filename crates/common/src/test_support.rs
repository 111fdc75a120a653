// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::TempDir;

use crate::path_manager::PathManager;

/// A throwaway project directory for tests. Removed when dropped.
pub struct ProjectFixture {
    dir: TempDir,
}

impl ProjectFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create tempdir");
        std::fs::create_dir_all(dir.path().join("amplify/backend"))
            .expect("Failed to create project directory");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn paths(&self) -> PathManager {
        PathManager::new(self.dir.path())
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write_raw(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write fixture file");
        path
    }

    pub fn write_json<T: Serialize>(&self, relative: &str, value: &T) -> PathBuf {
        let content = serde_json::to_string_pretty(value).expect("Failed to serialize fixture");
        self.write_raw(relative, &content)
    }

    pub fn exists(&self, relative: &str) -> bool {
        self.path(relative).exists()
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}
