// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! egui rendering of template groups and their fields.
//!
//! The view only reads the form store; user input comes back as messages that the
//! MVU update applies through [`crate::fields::mapper::apply_change`].

use serde_json::{Map, Value};

use crate::fields::groups::{GroupSection, GroupsLayout, LayoutMode};
use crate::fields::mapper::{
    FieldChange, FieldProps, MapperContext, checked_labels, map_field, selected_ids,
};
use crate::fields::registry::FieldWidget;
use crate::form::FormStore;
use crate::models::template::{AttributeValue, Id, ProductTemplate};
use crate::ui::components::{date_field, toggle_switch};

/// Width of a field in card mode; panel mode fills the column.
const CARD_FIELD_WIDTH: f32 = 220.0;

/// A change produced by one rendered field, addressed by the attribute's raw `fieldName`.
#[derive(Clone, Debug, PartialEq)]
pub struct TemplateFieldsMsg {
    pub field_name: String,
    pub change: FieldChange,
}

/// Everything the view needs besides the layout itself.
pub struct ViewContext<'a> {
    pub template: &'a ProductTemplate,
    pub store: &'a FormStore,
    pub is_validation: bool,
    pub product_id: Option<&'a Id>,
    pub locale: &'a str,
}

/// Render the template and return triggered messages.
pub fn view(
    ui: &mut egui::Ui,
    layout: &GroupsLayout<'_>,
    ctx: &ViewContext<'_>,
) -> Vec<TemplateFieldsMsg> {
    let mut msgs = Vec::new();

    ui.vertical(|ui| {
        ui.spacing_mut().item_spacing.y = 16.0;
        for section in &layout.sections {
            ui.push_id(section.key, |ui| match layout.mode {
                LayoutMode::Panel => render_panel_section(ui, section, layout.fluid, ctx, &mut msgs),
                LayoutMode::Card => render_card(ui, section, layout.fluid, ctx, &mut msgs),
            });
        }
    });

    msgs
}

fn render_panel_section(
    ui: &mut egui::Ui,
    section: &GroupSection<'_>,
    fluid: bool,
    ctx: &ViewContext<'_>,
    msgs: &mut Vec<TemplateFieldsMsg>,
) {
    ui.label(egui::RichText::new(section.key).strong().size(15.0));
    ui.vertical(|ui| {
        ui.spacing_mut().item_spacing.y = 10.0;
        render_section_fields(ui, section, fluid, ctx, msgs);
    });
}

fn render_card(
    ui: &mut egui::Ui,
    section: &GroupSection<'_>,
    fluid: bool,
    ctx: &ViewContext<'_>,
    msgs: &mut Vec<TemplateFieldsMsg>,
) {
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(12))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.heading(section.key);
            ui.add_space(8.0);
            ui.horizontal_wrapped(|ui| {
                ui.spacing_mut().item_spacing.x = 24.0;
                render_section_fields(ui, section, fluid, ctx, msgs);
            });
        });
}

fn render_section_fields(
    ui: &mut egui::Ui,
    section: &GroupSection<'_>,
    fluid: bool,
    ctx: &ViewContext<'_>,
    msgs: &mut Vec<TemplateFieldsMsg>,
) {
    for field in &section.fields {
        let mapper_ctx = MapperContext {
            template: Some(ctx.template),
            permission: field.permission,
            is_validation: ctx.is_validation,
            fluid,
            product_id: ctx.product_id,
            locale: ctx.locale,
        };
        let Some(props) = map_field(field.attribute, ctx.store, &mapper_ctx) else {
            continue;
        };
        for change in render_field(ui, &props) {
            msgs.push(TemplateFieldsMsg {
                field_name: field.attribute.field_name.clone(),
                change,
            });
        }
    }
}

/// Label, widget, and error/warning lines for one field.
fn render_field(ui: &mut egui::Ui, props: &FieldProps) -> Vec<FieldChange> {
    let mut changes = Vec::new();

    ui.push_id(&props.test_id, |ui| {
        ui.vertical(|ui| {
            if props.fluid {
                ui.set_width(ui.available_width());
            } else {
                ui.set_width(CARD_FIELD_WIDTH);
            }

            render_label(ui, props);
            ui.push_id(props.widget.kind(), |ui| {
                ui.add_enabled_ui(!props.disabled, |ui| {
                    render_widget(ui, props, &mut changes);
                });
            });

            if let Some(error) = &props.error_message {
                ui.label(
                    egui::RichText::new(error)
                        .small()
                        .color(ui.visuals().error_fg_color),
                );
            }
            if let Some(warning) = props.warning_message {
                ui.push_id(&props.warning_test_id, |ui| {
                    ui.label(
                        egui::RichText::new(format!(
                            "{} {}",
                            egui_phosphor::regular::WARNING,
                            warning
                        ))
                        .small()
                        .color(ui.visuals().warn_fg_color),
                    );
                });
            }
        });
    });

    changes
}

fn render_label(ui: &mut egui::Ui, props: &FieldProps) {
    let Some((caption, help)) = label_line(props) else {
        return;
    };

    ui.horizontal(|ui| {
        if !caption.is_empty() {
            ui.label(caption);
        }
        if let Some(help) = help {
            ui.label(
                egui::RichText::new(egui_phosphor::regular::INFO)
                    .color(egui::Color32::from_gray(120)),
            )
            .on_hover_text(help);
        }
    });
}

/// Caption (possibly just the required marker) and help text shown above a widget.
/// `None` when there is nothing to show.
fn label_line(props: &FieldProps) -> Option<(String, Option<&str>)> {
    // Radio groups hide their caption when there is nothing to pick, and the
    // expandable text area carries it on its own button.
    let hide_caption = match props.widget {
        FieldWidget::RadioGroup { .. } => props.values.as_ref().is_none_or(Vec::is_empty),
        FieldWidget::ExpandTextarea { .. } => true,
        _ => false,
    };

    let mut caption = if hide_caption {
        String::new()
    } else {
        props.label.clone()
    };
    if props.required {
        if !caption.is_empty() {
            caption.push(' ');
        }
        caption.push('*');
    }
    let help = props.help_text.as_deref();
    (!caption.is_empty() || help.is_some()).then_some((caption, help))
}

fn render_widget(ui: &mut egui::Ui, props: &FieldProps, changes: &mut Vec<FieldChange>) {
    let value = props.value.as_ref();
    match props.widget {
        FieldWidget::CheckboxGroup => render_checkbox_group(ui, props, changes),
        FieldWidget::Datepicker { with_range: false } => {
            if let Some(new) = date_field::view_date(ui, &props.test_id, value) {
                changes.push(FieldChange::Value(new));
            }
        }
        FieldWidget::Datepicker { with_range: true } => {
            if let Some(new) = date_field::view_range(ui, &props.test_id, value) {
                changes.push(FieldChange::Value(new));
            }
        }
        FieldWidget::FishingMethodSelector | FieldWidget::VarietySelector => {
            render_catalog_selector(ui, props, changes)
        }
        FieldWidget::QualitySelector => {
            if let Some(new) = single_select(ui, props, props.values.as_deref(), true) {
                changes.push(FieldChange::Value(new));
            }
        }
        FieldWidget::Input => {
            let mut text = value_as_text(value);
            if ui
                .add(egui::TextEdit::singleline(&mut text).desired_width(f32::INFINITY))
                .changed()
            {
                changes.push(FieldChange::Value(Value::String(text)));
            }
        }
        FieldWidget::InputNumber => {
            if let Some(new) = number_input(ui, &props.test_id, value) {
                changes.push(FieldChange::Value(new));
            }
        }
        FieldWidget::InputSelect { clearable, .. } => {
            ui.horizontal(|ui| {
                if let Some(new) = number_input(ui, &props.test_id, value) {
                    changes.push(FieldChange::Value(new));
                }
                if let Some(option) = option_combo(
                    ui,
                    &format!("{}-option", props.test_id),
                    props.options.as_deref(),
                    props.selected_option.as_ref(),
                    clearable,
                ) {
                    changes.push(FieldChange::SelectOption(option));
                }
            });
        }
        FieldWidget::LabelSelector => render_label_chips(ui, props, changes),
        FieldWidget::Select {
            multiple: true,
            searchable,
            ..
        } => render_multi_select(ui, props, searchable, changes),
        FieldWidget::Select {
            multiple: false,
            clearable,
            ..
        } => {
            if let Some(new) = single_select(ui, props, props.options.as_deref(), clearable) {
                changes.push(FieldChange::Value(new));
            }
        }
        FieldWidget::RadioGroup { allow_deselection } => {
            let current = value.and_then(Id::from_value);
            for option in props.values.as_deref().unwrap_or_default() {
                let selected = current.as_ref() == Some(&option.value);
                if ui.radio(selected, option.label.as_str()).clicked() {
                    let new = if selected && allow_deselection {
                        Value::Null
                    } else {
                        option.value.to_value()
                    };
                    changes.push(FieldChange::Value(new));
                }
            }
        }
        FieldWidget::ExpandTextarea { max_length } => {
            egui::CollapsingHeader::new(props.label.as_str())
                .id_salt(&props.test_id)
                .default_open(!value_as_text(value).is_empty())
                .show(ui, |ui| {
                    let mut text = value_as_text(value);
                    let response = ui.add(
                        egui::TextEdit::multiline(&mut text)
                            .char_limit(max_length)
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );
                    ui.label(
                        egui::RichText::new(format!("{}/{}", text.chars().count(), max_length))
                            .small()
                            .color(egui::Color32::from_gray(120)),
                    );
                    if response.changed() {
                        changes.push(FieldChange::Value(Value::String(text)));
                    }
                });
        }
        FieldWidget::Toggle => {
            let mut on = value.and_then(Value::as_bool).unwrap_or(false);
            if toggle_switch(ui, &mut on).changed() {
                changes.push(FieldChange::Value(Value::Bool(on)));
            }
        }
        FieldWidget::TranslatedInput => {
            let locale = props.default_locale.as_deref().unwrap_or("en");
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(locale.to_uppercase())
                        .small()
                        .color(egui::Color32::from_gray(120)),
                );
                let mut text = value
                    .and_then(|v| v.get(locale))
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                if ui
                    .add(egui::TextEdit::singleline(&mut text).desired_width(f32::INFINITY))
                    .changed()
                {
                    changes.push(FieldChange::Value(with_translation(value, locale, text)));
                }
            });
        }
    }
}

fn render_checkbox_group(ui: &mut egui::Ui, props: &FieldProps, changes: &mut Vec<FieldChange>) {
    let values = props.values.as_deref();
    let checked = checked_labels(values, props.value.as_ref());
    for option in values.unwrap_or_default() {
        let mut is_on = checked.contains(&option.label);
        if ui.checkbox(&mut is_on, option.label.as_str()).changed() {
            let labels = toggled(&checked, &option.label, is_on);
            changes.push(FieldChange::CheckedLabels(labels));
        }
    }
}

fn render_label_chips(ui: &mut egui::Ui, props: &FieldProps, changes: &mut Vec<FieldChange>) {
    let values = props.values.as_deref().unwrap_or_default();
    if values.is_empty() {
        ui.label(
            egui::RichText::new("No labels available.")
                .italics()
                .color(egui::Color32::from_gray(110)),
        );
        return;
    }
    let selected = selected_ids(props.value.as_ref());
    ui.horizontal_wrapped(|ui| {
        for option in values {
            let is_on = selected.contains(&option.value);
            if ui
                .add(egui::Button::new(option.label.as_str()).selected(is_on))
                .clicked()
            {
                changes.push(FieldChange::Value(toggled_ids(values, &selected, &option.value)));
            }
        }
    });
}

fn render_multi_select(
    ui: &mut egui::Ui,
    props: &FieldProps,
    searchable: bool,
    changes: &mut Vec<FieldChange>,
) {
    let options = props.options.as_deref().unwrap_or_default();
    let selected = selected_ids(props.value.as_ref());
    let summary = options
        .iter()
        .filter(|option| selected.contains(&option.value))
        .map(|option| option.label.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    let search_id = ui.id().with("search");
    egui::ComboBox::from_id_salt(format!("{}-multi", props.test_id))
        .width(ui.available_width())
        .selected_text(if summary.is_empty() { "Select…" } else { summary.as_str() })
        .show_ui(ui, |ui| {
            let mut query = ui
                .data(|d| d.get_temp::<String>(search_id))
                .unwrap_or_default();
            if searchable
                && ui
                    .add(egui::TextEdit::singleline(&mut query).hint_text("Search"))
                    .changed()
            {
                ui.data_mut(|d| d.insert_temp(search_id, query.clone()));
            }
            for option in options.iter().filter(|o| matches_query(&o.label, &query)) {
                let mut is_on = selected.contains(&option.value);
                if ui.checkbox(&mut is_on, option.label.as_str()).changed() {
                    changes.push(FieldChange::Value(toggled_ids(options, &selected, &option.value)));
                }
            }
        });
}

/// Combo box over `options`. Returns the picked id, or null when cleared.
fn single_select(
    ui: &mut egui::Ui,
    props: &FieldProps,
    options: Option<&[AttributeValue]>,
    clearable: bool,
) -> Option<Value> {
    option_combo(
        ui,
        &format!("{}-select", props.test_id),
        options,
        props.value.as_ref(),
        clearable,
    )
}

fn option_combo(
    ui: &mut egui::Ui,
    id_salt: &str,
    options: Option<&[AttributeValue]>,
    current: Option<&Value>,
    clearable: bool,
) -> Option<Value> {
    let options = options.unwrap_or_default();
    let current = current.and_then(Id::from_value);
    let selected_text = options
        .iter()
        .find(|option| Some(&option.value) == current.as_ref())
        .map(|option| option.label.clone())
        .unwrap_or_else(|| "Select…".to_string());

    let mut picked = None;
    egui::ComboBox::from_id_salt(id_salt)
        .selected_text(selected_text)
        .show_ui(ui, |ui| {
            if clearable && current.is_some() && ui.button("Clear").clicked() {
                picked = Some(Value::Null);
            }
            for option in options {
                let is_current = current.as_ref() == Some(&option.value);
                if ui
                    .add(egui::Button::new(option.label.as_str()).selected(is_current))
                    .clicked()
                {
                    picked = Some(option.value.to_value());
                }
            }
        });
    picked
}

/// Catalog-backed selectors fall back to the template values, or a raw id entry.
fn render_catalog_selector(ui: &mut egui::Ui, props: &FieldProps, changes: &mut Vec<FieldChange>) {
    if props.values.as_ref().is_some_and(|values| !values.is_empty()) {
        if let Some(new) = single_select(ui, props, props.values.as_deref(), true) {
            changes.push(FieldChange::Value(new));
        }
        return;
    }

    let mut text = value_as_text(props.value.as_ref());
    let mut edit = egui::TextEdit::singleline(&mut text).hint_text("Catalog ID");
    if let Some(product) = &props.product_id {
        edit = edit.hint_text(format!("Catalog ID for product {product}"));
    }
    if ui.add(edit).changed() {
        let new = match text.trim().parse::<i64>() {
            Ok(id) => Value::from(id),
            Err(_) if text.trim().is_empty() => Value::Null,
            Err(_) => Value::String(text),
        };
        changes.push(FieldChange::Value(new));
    }
}

/// Text entry for numbers. An absent value shows as empty. While the entry has focus
/// the raw text is kept in egui memory, so partial input like `1.` or `-` survives
/// between frames. Returns the new value when the text parses.
fn number_input(ui: &mut egui::Ui, id_salt: &str, value: Option<&Value>) -> Option<Value> {
    let buffer_id = ui.id().with((id_salt, "number"));
    let mut text = ui
        .data(|d| d.get_temp::<String>(buffer_id))
        .unwrap_or_else(|| value_as_text(value));
    let response = ui.add(
        egui::TextEdit::singleline(&mut text)
            .hint_text("0")
            .desired_width(120.0),
    );

    let mut parsed = None;
    if response.changed() {
        parsed = parse_number(&text);
        ui.data_mut(|d| d.insert_temp(buffer_id, text));
    }
    if !response.has_focus() {
        ui.data_mut(|d| d.remove::<String>(buffer_id));
    }
    parsed
}

/// Parse number entry text. Blank clears the value, whole numbers are stored as
/// integers so they compare equal to seeded ids, and unparsable text is `None`.
fn parse_number(text: &str) -> Option<Value> {
    let text = text.trim();
    if text.is_empty() {
        return Some(Value::Null);
    }
    if let Ok(int) = text.parse::<i64>() {
        return Some(Value::from(int));
    }
    let float = text.parse::<f64>().ok().filter(|f| f.is_finite())?;
    if float.fract() == 0.0 && float.abs() < i64::MAX as f64 {
        return Some(Value::from(float as i64));
    }
    serde_json::Number::from_f64(float).map(Value::Number)
}

fn value_as_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn matches_query(label: &str, query: &str) -> bool {
    let query = query.trim();
    query.is_empty() || label.to_lowercase().contains(&query.to_lowercase())
}

/// Checked labels after flipping one checkbox, without duplicates.
fn toggled(checked: &[String], label: &str, on: bool) -> Vec<String> {
    let mut labels: Vec<String> = checked.iter().filter(|l| *l != label).cloned().collect();
    if on {
        labels.push(label.to_string());
    }
    labels
}

/// Selected ids after flipping one option, in declared option order.
fn toggled_ids(options: &[AttributeValue], selected: &[Id], flipped: &Id) -> Value {
    let was_on = selected.contains(flipped);
    Value::Array(
        options
            .iter()
            .filter(|option| {
                if &option.value == flipped {
                    !was_on
                } else {
                    selected.contains(&option.value)
                }
            })
            .map(|option| option.value.to_value())
            .collect(),
    )
}

/// Replace one locale's text in a translated value, keeping the others.
fn with_translation(value: Option<&Value>, locale: &str, text: String) -> Value {
    let mut map = value
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_else(Map::new);
    map.insert(locale.to_string(), Value::String(text));
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::{attribute, values};
    use crate::models::permissions::FormattedPermission;
    use crate::models::template::FieldType;
    use serde_json::json;

    #[test]
    fn toggled_labels_add_and_remove() {
        let checked = vec!["Fresh".to_string()];
        assert_eq!(toggled(&checked, "Frozen", true), vec!["Fresh", "Frozen"]);
        assert!(toggled(&checked, "Fresh", false).is_empty());
        assert_eq!(toggled(&checked, "Fresh", true), vec!["Fresh"]);
    }

    #[test]
    fn toggled_ids_keep_declared_order() {
        let options = values(&[(1, "a"), (2, "b"), (3, "c")]);
        let selected = vec![Id::Number(3)];
        assert_eq!(toggled_ids(&options, &selected, &Id::Number(1)), json!([1, 3]));
        assert_eq!(toggled_ids(&options, &selected, &Id::Number(3)), json!([]));
    }

    #[test]
    fn translations_preserve_other_locales() {
        let value = json!({"fr": "Cabillaud"});
        assert_eq!(
            with_translation(Some(&value), "en", "Cod".into()),
            json!({"fr": "Cabillaud", "en": "Cod"})
        );
        assert_eq!(with_translation(None, "en", "Cod".into()), json!({"en": "Cod"}));
    }

    #[test]
    fn text_rendering_of_stored_values() {
        assert_eq!(value_as_text(None), "");
        assert_eq!(value_as_text(Some(&Value::Null)), "");
        assert_eq!(value_as_text(Some(&json!("cod"))), "cod");
        assert_eq!(value_as_text(Some(&json!(12))), "12");
    }

    #[test]
    fn number_text_parses_to_integers_when_whole() {
        assert_eq!(parse_number("3"), Some(json!(3)));
        assert_eq!(parse_number(" 3.0 "), Some(json!(3)));
        assert_eq!(parse_number("0"), Some(json!(0)));
        assert_eq!(parse_number("-12"), Some(json!(-12)));
        assert_eq!(parse_number("2.5"), Some(json!(2.5)));
        assert_eq!(parse_number("1."), Some(json!(1)));
        assert_eq!(parse_number(""), Some(Value::Null));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("-"), None);

        // Whole numbers stay usable as ids and match item-seeded integers.
        let stored = parse_number("3").unwrap();
        assert_eq!(Id::from_value(&stored), Some(Id::Number(3)));
        assert_eq!(stored, json!(3));
    }

    fn props_for(field_type: FieldType, permission: Option<&FormattedPermission>) -> FieldProps {
        let mut attr = attribute("note", field_type);
        attr.required_at_creation = true;
        let ctx = MapperContext {
            template: None,
            permission,
            is_validation: false,
            fluid: false,
            product_id: None,
            locale: "en",
        };
        map_field(&attr, &FormStore::default(), &ctx).unwrap()
    }

    #[test]
    fn hidden_captions_keep_required_marker_and_help() {
        let permission = FormattedPermission {
            enabled: false,
            visible: true,
            disabled_reason: "Locked after validation".into(),
        };

        let textarea = props_for(FieldType::Textarea, Some(&permission));
        assert_eq!(
            label_line(&textarea),
            Some(("*".to_string(), Some("Locked after validation")))
        );

        let radio = props_for(FieldType::Radio, None);
        assert_eq!(label_line(&radio), Some(("*".to_string(), None)));

        let input = props_for(FieldType::Input, None);
        assert_eq!(label_line(&input), Some(("note *".to_string(), None)));

        let mut plain = props_for(FieldType::Textarea, None);
        plain.required = false;
        assert_eq!(label_line(&plain), None);
    }

    #[test]
    fn search_is_case_insensitive() {
        assert!(matches_query("Atlantic Cod", "cod"));
        assert!(matches_query("Atlantic Cod", "  "));
        assert!(!matches_query("Hake", "cod"));
    }
}
