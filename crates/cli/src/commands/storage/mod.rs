// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use self::{
    add::AddCommandDefinition, migrate::MigrateCommandDefinition, show::ShowCommandDefinition,
};

use super::command::SubcommandDefinition;
use crate::provider::ProviderRegistry;

pub(crate) mod add;
pub(crate) mod migrate;
pub(crate) mod show;

pub fn command_definition(registry: Arc<ProviderRegistry>) -> SubcommandDefinition {
    SubcommandDefinition::new(
        "storage",
        "Add, migrate and inspect storage resources",
        vec![
            Box::new(AddCommandDefinition { registry }),
            Box::new(MigrateCommandDefinition {}),
            Box::new(ShowCommandDefinition {}),
        ],
    )
}
