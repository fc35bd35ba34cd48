// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Per-attribute field state: value resolution, dependent options, permissions,
//! warnings and change handling.
//!
//! Everything here is recomputed from the form store on each call; nothing is cached
//! between frames.

use serde_json::Value;
use tracing::debug;

use crate::fields::predicates::{
    DIRTY_NOT_VALIDATE, REQUIRED_AT_VALIDATION_MESSAGE, SILENT, VALIDATE_AND_DIRTY,
    is_select_field,
};
use crate::fields::registry::{FieldWidget, widget_for};
use crate::form::{FormStore, is_empty_value};
use crate::models::permissions::FormattedPermission;
use crate::models::template::{
    AttributeValue, FieldType, Id, ProductTemplate, ProductTemplateAttribute,
};

/// Inputs shared by every field of a rendered template.
#[derive(Clone, Copy, Debug)]
pub struct MapperContext<'a> {
    pub template: Option<&'a ProductTemplate>,
    pub permission: Option<&'a FormattedPermission>,
    pub is_validation: bool,
    pub fluid: bool,
    pub product_id: Option<&'a Id>,
    pub locale: &'a str,
}

/// Unified property set handed to the widget renderer.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldProps {
    pub name: String,
    pub test_id: String,
    pub warning_test_id: String,
    pub label: String,
    pub widget: FieldWidget,
    pub value: Option<Value>,
    /// Resolved selectable values (dependent filtering applied).
    pub values: Option<Vec<AttributeValue>>,
    /// Same as `values`, only populated for select fields.
    pub options: Option<Vec<AttributeValue>>,
    pub disabled: bool,
    pub required: bool,
    pub error_message: Option<String>,
    pub warning_message: Option<&'static str>,
    pub help_text: Option<String>,
    pub fluid: bool,
    pub default_locale: Option<String>,
    pub selected_option: Option<Value>,
    pub product_id: Option<Id>,
}

/// Change emitted by a rendered field.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldChange {
    /// New primary value.
    Value(Value),
    /// Checkbox group selection expressed as labels.
    CheckedLabels(Vec<String>),
    /// New value of the companion option selector.
    SelectOption(Value),
}

/// Test id of a field element.
pub fn field_test_id(form_field_name: &str) -> String {
    format!("{form_field_name}-field")
}

/// Ids selected in a stored value. A scalar id counts as a single selection.
pub fn selected_ids(value: Option<&Value>) -> Vec<Id> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Id::from_value).collect(),
        Some(other) => Id::from_value(other).into_iter().collect(),
        None => Vec::new(),
    }
}

/// Selectable values of an attribute, narrowed by its related field's selection.
///
/// When the related attribute cannot be found or declares no values, the
/// attribute's own values are used.
pub fn resolve_values(
    attribute: &ProductTemplateAttribute,
    template: Option<&ProductTemplate>,
    related_value: Option<&Value>,
) -> Option<Vec<AttributeValue>> {
    if let Some(related_name) = attribute.raw_related_field_name() {
        let related = template
            .and_then(|template| template.find_attribute(related_name))
            .and_then(|related| related.values.as_ref());
        match related {
            Some(related_values) => {
                let selected = selected_ids(related_value);
                return Some(
                    related_values
                        .iter()
                        .filter(|candidate| selected.contains(&candidate.value))
                        .cloned()
                        .collect(),
                );
            }
            None => debug!(
                field = %attribute.field_name,
                related = related_name,
                "related field unresolved, using own values"
            ),
        }
    }
    attribute.values.clone()
}

/// Non-blocking warning for values only required once the product is validated.
pub fn warning_message(
    attribute: &ProductTemplateAttribute,
    value: Option<&Value>,
    is_validation: bool,
) -> Option<&'static str> {
    (attribute.required_at_validation
        && !attribute.required_at_creation
        && is_empty_value(value)
        && is_validation)
        .then_some(REQUIRED_AT_VALIDATION_MESSAGE)
}

/// Absent permission means unrestricted.
pub fn is_visible(permission: Option<&FormattedPermission>) -> bool {
    permission.is_none_or(|permission| permission.visible)
}

/// Whether the field renders disabled.
pub fn is_disabled(
    attribute: &ProductTemplateAttribute,
    permission: Option<&FormattedPermission>,
    is_validation: bool,
) -> bool {
    match permission {
        Some(permission) => !permission.enabled,
        None => is_validation && !attribute.displayed_at_validation,
    }
}

/// Labels of the selected ids, in declared value order.
pub fn checked_labels(values: Option<&[AttributeValue]>, value: Option<&Value>) -> Vec<String> {
    let selected = selected_ids(value);
    values
        .unwrap_or_default()
        .iter()
        .filter(|candidate| selected.contains(&candidate.value))
        .map(|candidate| candidate.label.clone())
        .collect()
}

/// Stored ids for a set of checked labels, in declared value order.
pub fn labels_to_ids(values: Option<&[AttributeValue]>, labels: &[String]) -> Value {
    Value::Array(
        values
            .unwrap_or_default()
            .iter()
            .filter(|candidate| labels.contains(&candidate.label))
            .map(|candidate| candidate.value.to_value())
            .collect(),
    )
}

/// Compute the full presentation state of one attribute.
///
/// Returns `None` when a permission hides the field.
pub fn map_field(
    attribute: &ProductTemplateAttribute,
    store: &FormStore,
    ctx: &MapperContext<'_>,
) -> Option<FieldProps> {
    if !is_visible(ctx.permission) {
        return None;
    }

    let name = attribute.form_field_name();
    let select_name = attribute.select_field_name();
    let related_name = attribute.related_field_name();

    let watched = store.watch(&[
        name.as_str(),
        select_name.as_deref().unwrap_or_default(),
        related_name.as_deref().unwrap_or_default(),
    ]);
    let &[value, select_value, related_value] = watched.as_slice() else {
        return None;
    };
    let select_value = select_value.filter(|_| select_name.is_some());
    let related_value = related_value.filter(|_| related_name.is_some());

    let values = resolve_values(attribute, ctx.template, related_value);
    let field_type = attribute.field_type;

    let error_message = select_name
        .as_deref()
        .and_then(|n| store.error(n))
        .or_else(|| store.error(&name))
        .map(|error| error.message.clone());

    Some(FieldProps {
        test_id: field_test_id(&name),
        warning_test_id: format!("{name}-warning-message"),
        label: attribute.label.clone(),
        widget: widget_for(field_type),
        value: value.cloned(),
        options: is_select_field(field_type).then(|| values.clone().unwrap_or_default()),
        values,
        disabled: is_disabled(attribute, ctx.permission, ctx.is_validation),
        required: attribute.required_at_creation,
        error_message,
        warning_message: warning_message(attribute, value, ctx.is_validation),
        help_text: ctx
            .permission
            .map(|permission| permission.disabled_reason.clone())
            .filter(|reason| !reason.is_empty()),
        fluid: ctx.fluid,
        default_locale: (field_type == FieldType::TranslatedInput)
            .then(|| ctx.locale.to_string()),
        selected_option: if field_type == FieldType::InputNumberSelect {
            select_value.cloned()
        } else {
            None
        },
        product_id: matches!(
            field_type,
            FieldType::FishingMethodSelect | FieldType::VarietySelect
        )
        .then_some(ctx.product_id)
        .flatten()
        .cloned(),
        name,
    })
}

/// Write a field change into the store.
pub fn apply_change(
    store: &mut FormStore,
    attribute: &ProductTemplateAttribute,
    change: FieldChange,
) {
    let name = attribute.form_field_name();
    match change {
        FieldChange::Value(value) => store.set_value(&name, value, VALIDATE_AND_DIRTY),
        FieldChange::CheckedLabels(labels) => {
            let ids = labels_to_ids(attribute.values.as_deref(), &labels);
            store.set_value(&name, ids, VALIDATE_AND_DIRTY);
        }
        FieldChange::SelectOption(value) => {
            if let Some(select_name) = attribute.select_field_name() {
                store.set_value(&select_name, value, DIRTY_NOT_VALIDATE);
            }
        }
    }
}

/// Pick the only remaining choice when the related selection narrows to one id.
///
/// Callers decide when to run this (after the related field was written); an
/// identical value is never rewritten. Returns whether the store was written.
pub fn auto_select(store: &mut FormStore, attribute: &ProductTemplateAttribute) -> bool {
    let Some(related_name) = attribute.related_field_name() else {
        return false;
    };
    let ids = selected_ids(store.value(&related_name));
    let [only] = ids.as_slice() else {
        return false;
    };
    let name = attribute.form_field_name();
    let value = only.to_value();
    if store.value(&name) == Some(&value) {
        return false;
    }
    debug!(field = %name, value = %only, "auto-selecting the only remaining option");
    store.set_value(&name, value, SILENT);
    true
}
