// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeSet;

use serde::Serialize;

/// An argument of a directive application that is no longer supported.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeprecatedArgument {
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    pub directive: String,
    pub argument: String,
}

/// Feature usage of an API that matters for a transformer migration.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveUsageReport {
    pub unsupported_directives: BTreeSet<String>,
    pub deprecated_arguments: Vec<DeprecatedArgument>,
    pub uses_custom_resolvers: bool,
    pub uses_overridden_resolvers: bool,
    pub uses_external_table_backend: bool,
    pub improved_pluralization: bool,
}

impl DirectiveUsageReport {
    /// Reasons the API cannot be migrated automatically. Empty when it can.
    pub fn blockers(&self) -> Vec<String> {
        let mut blockers = vec![];

        if !self.unsupported_directives.is_empty() {
            let names: Vec<_> = self
                .unsupported_directives
                .iter()
                .map(String::as_str)
                .collect();
            blockers.push(format!("Unsupported directives: {}", names.join(", ")));
        }
        if self.uses_custom_resolvers {
            blockers.push(
                "The schema defines Query, Mutation or Subscription types with custom resolvers"
                    .to_string(),
            );
        }
        if self.uses_overridden_resolvers {
            blockers.push("The API overrides generated resolvers".to_string());
        }
        if self.uses_external_table_backend {
            blockers.push("The API is backed by an external relational database".to_string());
        }
        if !self.improved_pluralization {
            blockers.push("The improved pluralization feature flag is not enabled".to_string());
        }

        blockers
    }

    pub fn is_migration_ready(&self) -> bool {
        self.blockers().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_report() {
        let report = DirectiveUsageReport {
            improved_pluralization: true,
            ..Default::default()
        };

        assert!(report.is_migration_ready());
    }

    #[test]
    fn blockers_are_listed() {
        let report = DirectiveUsageReport {
            unsupported_directives: BTreeSet::from([
                "versioned".to_string(),
                "http".to_string(),
            ]),
            uses_overridden_resolvers: true,
            ..Default::default()
        };

        assert_eq!(
            report.blockers(),
            vec![
                "Unsupported directives: http, versioned".to_string(),
                "The API overrides generated resolvers".to_string(),
                "The improved pluralization feature flag is not enabled".to_string(),
            ]
        );
    }
}
