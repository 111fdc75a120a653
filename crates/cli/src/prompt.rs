// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Questions asked while walking the user through a command.

use inquire::error::InquireResult;

pub trait Prompter: Send + Sync {
    fn text(&self, message: &str, default: Option<&str>) -> InquireResult<String>;

    fn confirm(&self, message: &str, default: bool) -> InquireResult<bool>;

    /// Index of the chosen option.
    fn select(
        &self,
        message: &str,
        options: &[String],
        default: Option<usize>,
    ) -> InquireResult<usize>;
}

/// Asks on the terminal.
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn text(&self, message: &str, default: Option<&str>) -> InquireResult<String> {
        let mut prompt = inquire::Text::new(message);
        if let Some(default) = default {
            prompt = prompt.with_default(default);
        }
        prompt.prompt()
    }

    fn confirm(&self, message: &str, default: bool) -> InquireResult<bool> {
        inquire::Confirm::new(message)
            .with_default(default)
            .prompt()
    }

    fn select(
        &self,
        message: &str,
        options: &[String],
        default: Option<usize>,
    ) -> InquireResult<usize> {
        let mut prompt = inquire::Select::new(message, options.to_vec());
        if let Some(default) = default {
            prompt = prompt.with_starting_cursor(default);
        }
        prompt.raw_prompt().map(|choice| choice.index)
    }
}

#[cfg(test)]
pub use predefined::{Answer, PredefinedPrompter};
