// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Type of a table attribute.
///
/// The `null` type has no variant: it is represented by the absence of a type
/// (`Option<AttributeType>::None`), which serializes to JSON `null`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum AttributeType {
    String,
    Number,
    Binary,
    Boolean,
    List,
    Map,
    StringSet,
    NumberSet,
    BinarySet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeCode(pub String);

impl AttributeType {
    pub const ALL: [AttributeType; 9] = [
        AttributeType::String,
        AttributeType::Number,
        AttributeType::Binary,
        AttributeType::Boolean,
        AttributeType::List,
        AttributeType::Map,
        AttributeType::StringSet,
        AttributeType::NumberSet,
        AttributeType::BinarySet,
    ];

    /// Translate a legacy (CloudFormation) attribute type code.
    ///
    /// `NULL` maps to `Ok(None)`; codes outside the table are an error so the caller can decide
    /// whether to record or reject them.
    pub fn from_legacy_code(code: &str) -> Result<Option<AttributeType>, UnknownTypeCode> {
        let attribute_type = match code {
            "S" => AttributeType::String,
            "N" => AttributeType::Number,
            "B" => AttributeType::Binary,
            "BOOL" => AttributeType::Boolean,
            "L" => AttributeType::List,
            "M" => AttributeType::Map,
            "NULL" => return Ok(None),
            "SS" => AttributeType::StringSet,
            "NS" => AttributeType::NumberSet,
            "BS" => AttributeType::BinarySet,
            _ => return Err(UnknownTypeCode(code.to_string())),
        };

        Ok(Some(attribute_type))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeType::String => "string",
            AttributeType::Number => "number",
            AttributeType::Binary => "binary",
            AttributeType::Boolean => "boolean",
            AttributeType::List => "list",
            AttributeType::Map => "map",
            AttributeType::StringSet => "string-set",
            AttributeType::NumberSet => "number-set",
            AttributeType::BinarySet => "binary-set",
        }
    }

    /// Whether the type may be used for a partition or sort key.
    pub fn is_key_type(&self) -> bool {
        matches!(
            self,
            AttributeType::String | AttributeType::Number | AttributeType::Binary
        )
    }
}

impl Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
