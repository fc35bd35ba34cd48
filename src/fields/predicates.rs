// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field type classification and validation rule factories.

use crate::form::{Rule, SetValueConfig};
use crate::models::template::FieldType;

/// Warning shown when a value is only required once the product is validated.
pub const REQUIRED_AT_VALIDATION_MESSAGE: &str = "This field is required for validation";

/// Seeding server-provided values: checked but not counted as a user edit.
pub const VALIDATE_NOT_DIRTY: SetValueConfig = SetValueConfig {
    should_dirty: false,
    should_validate: true,
};

/// User edits.
pub const VALIDATE_AND_DIRTY: SetValueConfig = SetValueConfig {
    should_dirty: true,
    should_validate: true,
};

/// Companion selector edits; validity follows the primary field.
pub const DIRTY_NOT_VALIDATE: SetValueConfig = SetValueConfig {
    should_dirty: true,
    should_validate: false,
};

/// Programmatic writes that should not look like edits (auto-select).
pub const SILENT: SetValueConfig = SetValueConfig {
    should_dirty: false,
    should_validate: false,
};

/// Field types storing a collection of ids rather than a scalar.
pub fn is_array_field(field_type: FieldType) -> bool {
    matches!(
        field_type,
        FieldType::Checkbox | FieldType::LabelSelect | FieldType::MultiSelect
    )
}

/// Field types receiving a computed `options` list.
pub fn is_select_field(field_type: FieldType) -> bool {
    matches!(
        field_type,
        FieldType::SingleSelect | FieldType::MultiSelect | FieldType::InputNumberSelect
    )
}

/// Required-value rule matching the stored shape of a field type.
pub fn required_rule(field_type: FieldType) -> Rule {
    if is_array_field(field_type) {
        Rule::RequiredArray
    } else {
        Rule::Required
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_fields_are_checkbox_label_and_multi_select() {
        assert!(is_array_field(FieldType::Checkbox));
        assert!(is_array_field(FieldType::LabelSelect));
        assert!(is_array_field(FieldType::MultiSelect));

        assert!(!is_array_field(FieldType::Datepicker));
        assert!(!is_array_field(FieldType::Radio));
        assert!(!is_array_field(FieldType::SingleSelect));
    }

    #[test]
    fn select_fields_receive_options() {
        assert!(is_select_field(FieldType::SingleSelect));
        assert!(is_select_field(FieldType::MultiSelect));
        assert!(is_select_field(FieldType::InputNumberSelect));

        assert!(!is_select_field(FieldType::Checkbox));
        assert!(!is_select_field(FieldType::Radio));
        assert!(!is_select_field(FieldType::LabelSelect));
    }

    #[test]
    fn required_rule_follows_value_shape() {
        assert_eq!(required_rule(FieldType::Checkbox), Rule::RequiredArray);
        assert_eq!(required_rule(FieldType::Input), Rule::Required);
        assert_eq!(required_rule(FieldType::Toggle), Rule::Required);
    }
}
