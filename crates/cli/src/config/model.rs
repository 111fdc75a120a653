// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::{Result, anyhow};
use semver::{Version, VersionReq};

#[derive(Debug, PartialEq, Default)]
pub struct Config {
    pub amp: Option<AmpConfig>,
    pub storage: StorageConfig,
}

#[derive(Debug, PartialEq, Default)]
pub struct AmpConfig {
    pub version: Option<VersionReq>,
}

#[derive(Debug, PartialEq, Default)]
pub struct StorageConfig {
    /// Service preselected by `amp storage add`
    pub default_service: Option<String>,
}

impl Config {
    pub fn assert_tool_version(&self) -> Result<()> {
        let current_tool_version = Version::parse(env!("CARGO_PKG_VERSION"))?;
        self.assert_version_matches(&current_tool_version)
    }

    fn assert_version_matches(&self, current_tool_version: &Version) -> Result<()> {
        let required = self.amp.as_ref().and_then(|amp| amp.version.as_ref());

        if let Some(required_tool_version) = required
            && !required_tool_version.matches(current_tool_version)
        {
            return Err(anyhow!(
                "Tool version mismatch. Config requires amp version {}, but {} is installed.",
                required_tool_version,
                current_tool_version
            ));
        }

        Ok(())
    }
}
