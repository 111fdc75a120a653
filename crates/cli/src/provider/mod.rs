// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Provisioners that create resources for a category, looked up by provider name.

use std::collections::HashMap;

use anyhow::Result;
use common::path_manager::PathManager;
use dynamodb_input_state::DYNAMODB_SERVICE;

use crate::prompt::Prompter;

mod awscloudformation;
mod dynamodb_walkthrough;

pub use awscloudformation::{AWS_CLOUDFORMATION_PROVIDER, AwsCloudFormationProvisioner};

/// A storage service and the provider that provisions it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceMetadata {
    pub service: &'static str,
    pub provider: &'static str,
}

const SUPPORTED_SERVICES: &[ServiceMetadata] = &[ServiceMetadata {
    service: DYNAMODB_SERVICE,
    provider: AWS_CLOUDFORMATION_PROVIDER,
}];

pub fn supported_services() -> &'static [ServiceMetadata] {
    SUPPORTED_SERVICES
}

/// What the user chose before the provisioner takes over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddResourceOptions {
    pub service: String,
    pub provider_plugin: String,
}

pub trait ResourceProvisioner: Send + Sync {
    /// Walk the user through creating a resource and record it in the project. Returns the name
    /// of the new resource.
    fn add_resource(
        &self,
        prompter: &dyn Prompter,
        paths: &PathManager,
        category: &str,
        options: &AddResourceOptions,
    ) -> Result<String>;
}

#[derive(Default)]
pub struct ProviderRegistry {
    provisioners: HashMap<&'static str, Box<dyn ResourceProvisioner>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin_providers() -> Self {
        let mut registry = Self::new();
        registry.register(AWS_CLOUDFORMATION_PROVIDER, Box::new(AwsCloudFormationProvisioner));
        registry
    }

    pub fn register(&mut self, provider: &'static str, provisioner: Box<dyn ResourceProvisioner>) {
        self.provisioners.insert(provider, provisioner);
    }

    pub fn get(&self, provider: &str) -> Option<&dyn ResourceProvisioner> {
        self.provisioners.get(provider).map(|provisioner| provisioner.as_ref())
    }
}
