// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::BTreeMap;

use async_graphql_parser::{
    Positioned,
    types::{ConstDirective, ServiceDocument, TypeKind, TypeSystemDefinition},
};

use crate::InspectorError;

pub fn parse_schema_document(text: &str) -> Result<ServiceDocument, InspectorError> {
    async_graphql_parser::parse_schema(text).map_err(InspectorError::Parse)
}

/// A directive applied somewhere in a schema document.
#[derive(Debug, Clone, Copy)]
pub struct DirectiveUsage<'a> {
    /// The type the directive belongs to; `None` for directives on the schema definition.
    pub type_name: Option<&'a str>,
    /// The field, argument owner or enum value the directive is attached to; `None` when it is
    /// attached to the type itself.
    pub field_name: Option<&'a str>,
    pub directive: &'a ConstDirective,
}

impl DirectiveUsage<'_> {
    pub fn name(&self) -> &str {
        self.directive.name.node.as_str()
    }
}

/// All directive applications in the document, in document order.
///
/// Covers directives on schema definitions, types (including extensions), fields, field
/// arguments, input fields and enum values.
pub fn collect_directives(document: &ServiceDocument) -> Vec<DirectiveUsage<'_>> {
    let mut usages = vec![];

    for definition in &document.definitions {
        match definition {
            TypeSystemDefinition::Schema(schema) => {
                push_all(&mut usages, None, None, &schema.node.directives);
            }
            TypeSystemDefinition::Type(type_definition) => {
                let type_definition = &type_definition.node;
                let type_name = Some(type_definition.name.node.as_str());

                push_all(&mut usages, type_name, None, &type_definition.directives);

                match &type_definition.kind {
                    TypeKind::Object(object) => {
                        for field in &object.fields {
                            collect_field(&mut usages, type_name, &field.node);
                        }
                    }
                    TypeKind::Interface(interface) => {
                        for field in &interface.fields {
                            collect_field(&mut usages, type_name, &field.node);
                        }
                    }
                    TypeKind::InputObject(input_object) => {
                        for field in &input_object.fields {
                            let field = &field.node;
                            push_all(
                                &mut usages,
                                type_name,
                                Some(field.name.node.as_str()),
                                &field.directives,
                            );
                        }
                    }
                    TypeKind::Enum(enum_type) => {
                        for value in &enum_type.values {
                            let value = &value.node;
                            push_all(
                                &mut usages,
                                type_name,
                                Some(value.value.node.as_str()),
                                &value.directives,
                            );
                        }
                    }
                    TypeKind::Scalar | TypeKind::Union(_) => {}
                }
            }
            TypeSystemDefinition::Directive(_) => {}
        }
    }

    usages
}

/// Directive names used by each type (on the type itself or any of its members), without
/// duplicates and in order of first use.
pub fn collect_directives_by_type_names(document: &ServiceDocument) -> BTreeMap<&str, Vec<&str>> {
    let mut by_type: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

    for usage in collect_directives(document) {
        let Some(type_name) = usage.type_name else {
            continue;
        };
        let names = by_type.entry(type_name).or_default();
        let name = usage.directive.name.node.as_str();
        if !names.contains(&name) {
            names.push(name);
        }
    }

    by_type
}

fn collect_field<'a>(
    usages: &mut Vec<DirectiveUsage<'a>>,
    type_name: Option<&'a str>,
    field: &'a async_graphql_parser::types::FieldDefinition,
) {
    let field_name = Some(field.name.node.as_str());
    push_all(usages, type_name, field_name, &field.directives);

    for argument in &field.arguments {
        push_all(usages, type_name, field_name, &argument.node.directives);
    }
}

fn push_all<'a>(
    usages: &mut Vec<DirectiveUsage<'a>>,
    type_name: Option<&'a str>,
    field_name: Option<&'a str>,
    directives: &'a [Positioned<ConstDirective>],
) {
    usages.extend(directives.iter().map(|directive| DirectiveUsage {
        type_name,
        field_name,
        directive: &directive.node,
    }));
}
