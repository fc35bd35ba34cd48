// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Template-driven field logic: type dispatch, per-field state and group lifecycle.
//! Nothing in here depends on egui so it stays unit-testable.

pub mod groups;
pub mod mapper;
pub mod predicates;
pub mod registry;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::template::{
        AttributeValue, FieldType, Id, ProductTemplate, ProductTemplateAttribute,
        ProductTemplateGroup,
    };

    /// Optional, unrestricted attribute of the given type.
    pub fn attribute(field_name: &str, field_type: FieldType) -> ProductTemplateAttribute {
        ProductTemplateAttribute {
            code: field_name.to_string(),
            field_name: field_name.to_string(),
            field_name_select: None,
            field_type,
            label: field_name.to_string(),
            related_field_name: Some(String::new()),
            required_at_creation: false,
            required_at_validation: false,
            displayed_at_validation: true,
            values: None,
        }
    }

    pub fn values(pairs: &[(i64, &str)]) -> Vec<AttributeValue> {
        pairs
            .iter()
            .map(|(value, label)| AttributeValue {
                value: Id::Number(*value),
                label: label.to_string(),
            })
            .collect()
    }

    /// Single-group template holding the given attributes.
    pub fn template_of(attributes: Vec<ProductTemplateAttribute>) -> ProductTemplate {
        ProductTemplate {
            name: "template".into(),
            groups: vec![ProductTemplateGroup {
                name: "group".into(),
                attributes,
            }],
        }
    }
}
