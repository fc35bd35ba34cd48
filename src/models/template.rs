// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Product template definitions as delivered by the catalog API.
//! Parsing is kept pure so it can be reused by the form logic and the UI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::utils::field_name::{self, NameCollision};

/// Errors raised at the template input boundary.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown field type `{0}`")]
    UnknownFieldType(String),
    #[error("failed to parse template JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Closed set of field types a template attribute may declare.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    Checkbox,
    Datepicker,
    FishingMethodSelect,
    Input,
    InputNumber,
    InputNumberSelect,
    LabelSelect,
    MultiSelect,
    QualitySelect,
    Radio,
    RangeDatepicker,
    SingleSelect,
    Textarea,
    Toggle,
    TranslatedInput,
    VarietySelect,
}

impl FieldType {
    /// Every variant, in wire-tag order.
    pub const ALL: [FieldType; 16] = [
        Self::Checkbox,
        Self::Datepicker,
        Self::FishingMethodSelect,
        Self::Input,
        Self::InputNumber,
        Self::InputNumberSelect,
        Self::LabelSelect,
        Self::MultiSelect,
        Self::QualitySelect,
        Self::Radio,
        Self::RangeDatepicker,
        Self::SingleSelect,
        Self::Textarea,
        Self::Toggle,
        Self::TranslatedInput,
        Self::VarietySelect,
    ];

    /// Wire tag used by the template API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkbox => "CHECKBOX",
            Self::Datepicker => "DATEPICKER",
            Self::FishingMethodSelect => "FISHING_METHOD_SELECT",
            Self::Input => "INPUT",
            Self::InputNumber => "INPUT_NUMBER",
            Self::InputNumberSelect => "INPUT_NUMBER_SELECT",
            Self::LabelSelect => "LABEL_SELECT",
            Self::MultiSelect => "MULTI_SELECT",
            Self::QualitySelect => "QUALITY_SELECT",
            Self::Radio => "RADIO",
            Self::RangeDatepicker => "RANGE_DATEPICKER",
            Self::SingleSelect => "SINGLE_SELECT",
            Self::Textarea => "TEXTAREA",
            Self::Toggle => "TOGGLE",
            Self::TranslatedInput => "TRANSLATED_INPUT",
            Self::VarietySelect => "VARIETY_SELECT",
        }
    }
}

impl FromStr for FieldType {
    type Err = TemplateError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw.trim())
            .ok_or_else(|| TemplateError::UnknownFieldType(raw.to_string()))
    }
}

impl TryFrom<String> for FieldType {
    type Error = TemplateError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

impl From<FieldType> for String {
    fn from(kind: FieldType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a selectable attribute value. The API sends either numbers or strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Number(i64),
    Text(String),
}

impl Id {
    /// Read an id out of a stored form value. Floats and non-scalars are not ids.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Number),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One selectable `{value, label}` pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeValue {
    pub value: Id,
    pub label: String,
}

/// A single form field declared by a template.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTemplateAttribute {
    pub code: String,
    pub field_name: String,
    #[serde(default)]
    pub field_name_select: Option<String>,
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub related_field_name: Option<String>,
    #[serde(default)]
    pub required_at_creation: bool,
    #[serde(default)]
    pub required_at_validation: bool,
    #[serde(default = "default_displayed")]
    pub displayed_at_validation: bool,
    #[serde(default)]
    pub values: Option<Vec<AttributeValue>>,
}

fn default_displayed() -> bool {
    true
}

impl ProductTemplateAttribute {
    /// Normalized key of this attribute in the form store.
    pub fn form_field_name(&self) -> String {
        field_name::normalize_field_name(&self.field_name)
    }

    /// Normalized key of the companion numeric-entry selector, if any.
    pub fn select_field_name(&self) -> Option<String> {
        field_name::normalize_optional(self.field_name_select.as_deref())
    }

    /// Raw `fieldName` of the attribute constraining this one, if any.
    pub fn raw_related_field_name(&self) -> Option<&str> {
        self.related_field_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Normalized form key of the related attribute, if any.
    pub fn related_field_name(&self) -> Option<String> {
        field_name::normalize_optional(self.raw_related_field_name())
    }
}

/// Named group of attributes, rendered as one card or panel section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTemplateGroup {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<ProductTemplateAttribute>,
}

/// Template describing every form field of a product, in display order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductTemplate {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<ProductTemplateGroup>,
}

impl ProductTemplate {
    /// All attributes flattened across groups, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &ProductTemplateAttribute> {
        self.groups.iter().flat_map(|group| group.attributes.iter())
    }

    /// Find an attribute by its raw `fieldName`.
    pub fn find_attribute(&self, raw_field_name: &str) -> Option<&ProductTemplateAttribute> {
        self.attributes()
            .find(|attribute| attribute.field_name == raw_field_name)
    }

    /// Normalized names claimed by more than one attribute (primary or companion).
    pub fn name_collisions(&self) -> Vec<NameCollision> {
        let names = self.attributes().flat_map(|attribute| {
            std::iter::once(attribute.field_name.as_str()).chain(
                attribute
                    .field_name_select
                    .as_deref()
                    .filter(|name| !name.trim().is_empty()),
            )
        });
        field_name::find_collisions(names)
    }
}

/// Parse a product template from its API JSON representation.
pub fn parse_template(json: &str) -> Result<ProductTemplate, TemplateError> {
    Ok(serde_json::from_str(json)?)
}
