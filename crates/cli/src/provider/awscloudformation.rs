// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use anyhow::{Result, bail};
use common::path_manager::PathManager;
use dynamodb_input_state::DYNAMODB_SERVICE;

use crate::prompt::Prompter;

use super::{AddResourceOptions, ResourceProvisioner, dynamodb_walkthrough};

pub const AWS_CLOUDFORMATION_PROVIDER: &str = "awscloudformation";

pub struct AwsCloudFormationProvisioner;

impl ResourceProvisioner for AwsCloudFormationProvisioner {
    fn add_resource(
        &self,
        prompter: &dyn Prompter,
        paths: &PathManager,
        category: &str,
        options: &AddResourceOptions,
    ) -> Result<String> {
        tracing::debug!(
            "Adding {} resource to category {} with {}",
            options.service,
            category,
            options.provider_plugin
        );

        match options.service.as_str() {
            DYNAMODB_SERVICE => dynamodb_walkthrough::add_walkthrough(prompter, paths, options),
            service => bail!(
                "Service {} is not supported by provider {}",
                service,
                AWS_CLOUDFORMATION_PROVIDER
            ),
        }
    }
}
