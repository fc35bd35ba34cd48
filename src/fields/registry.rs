// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Dispatch table from template field types to concrete widgets.
//!
//! The match in [`widget_for`] is exhaustive over [`FieldType`], so adding a field
//! type without a widget fails to compile.

use crate::models::template::FieldType;

/// Character cap of the expandable text area.
pub const TEXTAREA_MAX_LENGTH: usize = 320;

/// Concrete widget a field renders as, with any fixed configuration baked in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldWidget {
    /// Toggle-style checkbox group over the field's values.
    CheckboxGroup,
    Datepicker {
        with_range: bool,
    },
    FishingMethodSelector,
    Input,
    InputNumber,
    /// Number entry with a companion option selector.
    InputSelect {
        clearable: bool,
        single_option_read_only: bool,
    },
    LabelSelector,
    Select {
        multiple: bool,
        searchable: bool,
        clearable: bool,
    },
    QualitySelector,
    RadioGroup {
        allow_deselection: bool,
    },
    /// Text area collapsed behind a button labeled with the field label.
    ExpandTextarea {
        max_length: usize,
    },
    Toggle,
    TranslatedInput,
    VarietySelector,
}

/// Resolve the widget for a field type.
pub fn widget_for(field_type: FieldType) -> FieldWidget {
    match field_type {
        FieldType::Checkbox => FieldWidget::CheckboxGroup,
        FieldType::Datepicker => FieldWidget::Datepicker { with_range: false },
        FieldType::FishingMethodSelect => FieldWidget::FishingMethodSelector,
        FieldType::Input => FieldWidget::Input,
        FieldType::InputNumber => FieldWidget::InputNumber,
        FieldType::InputNumberSelect => FieldWidget::InputSelect {
            clearable: true,
            single_option_read_only: false,
        },
        FieldType::LabelSelect => FieldWidget::LabelSelector,
        FieldType::MultiSelect => FieldWidget::Select {
            multiple: true,
            searchable: true,
            clearable: false,
        },
        FieldType::QualitySelect => FieldWidget::QualitySelector,
        FieldType::Radio => FieldWidget::RadioGroup {
            allow_deselection: true,
        },
        FieldType::RangeDatepicker => FieldWidget::Datepicker { with_range: true },
        FieldType::SingleSelect => FieldWidget::Select {
            multiple: false,
            searchable: false,
            clearable: true,
        },
        FieldType::Textarea => FieldWidget::ExpandTextarea {
            max_length: TEXTAREA_MAX_LENGTH,
        },
        FieldType::Toggle => FieldWidget::Toggle,
        FieldType::TranslatedInput => FieldWidget::TranslatedInput,
        FieldType::VarietySelect => FieldWidget::VarietySelector,
    }
}

impl FieldWidget {
    /// Stable identifier of the rendered element kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::CheckboxGroup => "checkbox-group",
            Self::Datepicker { with_range: false } => "datepicker",
            Self::Datepicker { with_range: true } => "range-datepicker",
            Self::FishingMethodSelector => "fishing-method-selector",
            Self::Input => "input",
            Self::InputNumber => "input-number",
            Self::InputSelect { .. } => "input-select",
            Self::LabelSelector => "label-selector",
            Self::Select { multiple: true, .. } => "multi-select",
            Self::Select { multiple: false, .. } => "single-select",
            Self::QualitySelector => "quality-selector",
            Self::RadioGroup { .. } => "radio-group",
            Self::ExpandTextarea { .. } => "expand-textarea",
            Self::Toggle => "toggle",
            Self::TranslatedInput => "translated-input",
            Self::VarietySelector => "variety-selector",
        }
    }
}
