// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod map;

pub use map::MapEnvironment;

/// A source of string-valued settings keyed by name.
///
/// The process environment is the usual implementation, but tests and embedders
/// supply their own so that nothing has to mutate global process state.
pub trait Environment: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Whether `key` is switched on, or `None` when it is not set so that callers can fall
    /// through to another source.
    fn enabled_opt(&self, key: &str) -> Result<Option<bool>, EnvError> {
        self.get(key).map(|value| parse_bool(key, value)).transpose()
    }
}

fn parse_bool(key: &str, value: String) -> Result<bool, EnvError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "enabled" | "enable" => Ok(true),
        "false" | "0" | "no" | "off" | "disabled" | "disable" => Ok(false),
        _ => Err(EnvError::InvalidBoolean {
            key: key.to_string(),
            value,
        }),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(
        "Invalid value for {key}: {value}. Expected true, 1, yes, on, enabled, enable OR false, 0, no, off, disabled, disable"
    )]
    InvalidBoolean { key: String, value: String },
}

pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boolean_spellings() {
        let env = MapEnvironment::from([("A", "Yes"), ("B", "off"), ("C", "maybe")]);

        assert_eq!(env.enabled_opt("A").unwrap(), Some(true));
        assert_eq!(env.enabled_opt("B").unwrap(), Some(false));
        assert!(matches!(
            env.enabled_opt("C"),
            Err(EnvError::InvalidBoolean { .. })
        ));
    }

    #[test]
    fn optional_lookup() {
        let env = MapEnvironment::from([("A", "1")]);

        assert_eq!(env.enabled_opt("A").unwrap(), Some(true));
        assert_eq!(env.enabled_opt("B").unwrap(), None);
    }
}
