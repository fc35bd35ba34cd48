// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Root Model-View-Update kernel wiring form state, messages, and commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::fields::groups::{GroupsModel, LayoutMode};
use crate::fields::mapper::apply_change;
use crate::form::FormStore;
use crate::models::permissions::{FormattedPermissions, parse_permissions};
use crate::models::template::{Id, ProductTemplate, parse_template};
use crate::ui::components::template_fields::TemplateFieldsMsg;

/// Top-level application state.
#[derive(Default)]
pub struct AppModel {
    /// Loaded product template.
    pub template: Option<ProductTemplate>,
    /// Item whose keys seed initial values.
    pub item: Option<Value>,
    pub permissions: Option<FormattedPermissions>,
    pub product_id: Option<Id>,
    pub locale: String,
    /// Validation phase: warnings show and `displayedAtValidation` is honored.
    pub is_validation: bool,
    pub layout_mode: LayoutMode,
    /// Shared form state read by every field.
    pub form: FormStore,
    /// Registration lifecycle of the rendered template.
    pub groups: GroupsModel,
    /// Latest status message to display.
    pub status: Option<String>,
    /// Latest error message to display in modal.
    pub error: Option<String>,
    /// Count of queued background commands.
    pub pending_commands: usize,
}

impl AppModel {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            product_id: config.product_id(),
            locale: config.locale.clone(),
            is_validation: config.validation,
            layout_mode: config.layout_mode(),
            ..Default::default()
        }
    }
}

/// Which document a load refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Document {
    Template,
    Item,
    Permissions,
}

impl Document {
    fn label(self) -> &'static str {
        match self {
            Document::Template => "template",
            Document::Item => "item",
            Document::Permissions => "permissions",
        }
    }

    fn dialog_title(self) -> &'static str {
        match self {
            Document::Template => "Select product template JSON",
            Document::Item => "Select item JSON",
            Document::Permissions => "Select field permissions JSON",
        }
    }
}

/// Application messages routed through the update function.
pub enum Msg {
    OpenRequested(Document),
    TemplateLoaded {
        template: ProductTemplate,
        source: PathBuf,
    },
    ItemLoaded {
        item: Value,
        source: PathBuf,
    },
    PermissionsLoaded {
        permissions: FormattedPermissions,
        source: PathBuf,
    },
    LoadCancelled(Document),
    LoadFailed {
        document: Document,
        error: String,
    },
    ClearItem,
    SetValidation(bool),
    SetLayout(LayoutMode),
    CheckForm,
    DismissError,
    Fields(TemplateFieldsMsg),
}

/// Commands represent side-effects executed between frames.
#[derive(Debug, PartialEq)]
pub enum Command {
    PickFile(Document),
    LoadFile { document: Document, path: PathBuf },
}

/// Commands that open the documents named on the command line.
pub fn startup_commands(config: &AppConfig) -> Vec<Command> {
    [
        (Document::Template, &config.template),
        (Document::Item, &config.item),
        (Document::Permissions, &config.permissions),
    ]
    .into_iter()
    .filter_map(|(document, path)| {
        path.clone()
            .map(|path| Command::LoadFile { document, path })
    })
    .collect()
}

/// Update the application model and enqueue commands.
pub fn update(model: &mut AppModel, msg: Msg, cmds: &mut Vec<Command>) {
    match msg {
        Msg::OpenRequested(document) => cmds.push(Command::PickFile(document)),
        Msg::TemplateLoaded { template, source } => {
            let mut message = format!(
                "Loaded template '{}' with {} group(s) from {}",
                template.name,
                template.groups.len(),
                source.display()
            );
            let collisions = template.name_collisions().len();
            if collisions > 0 {
                message.push_str(&format!(
                    " ({collisions} field name collision(s), see log)"
                ));
            }
            surface_event(model, message, false);
            model.template = Some(template);
        }
        Msg::ItemLoaded { item, source } => {
            surface_event(model, format!("Loaded item from {}", source.display()), false);
            model.item = Some(item);
        }
        Msg::PermissionsLoaded {
            permissions,
            source,
        } => {
            surface_event(
                model,
                format!(
                    "Loaded permissions for {} field(s) from {}",
                    permissions.attributes.len(),
                    source.display()
                ),
                false,
            );
            model.permissions = Some(permissions);
        }
        Msg::LoadCancelled(document) => {
            surface_event(model, format!("Opening {} cancelled.", document.label()), false)
        }
        Msg::LoadFailed { document, error } => {
            warn!(document = document.label(), %error, "failed to load document");
            surface_event(
                model,
                format!("Failed to load {}:\n\n{error}", document.label()),
                true,
            );
        }
        Msg::ClearItem => {
            model.item = None;
            surface_event(model, "Item cleared.".to_string(), false);
        }
        Msg::SetValidation(on) => model.is_validation = on,
        Msg::SetLayout(mode) => model.layout_mode = mode,
        Msg::CheckForm => {
            let invalid = model.form.validate_all();
            let message = if invalid == 0 {
                "All fields are valid.".to_string()
            } else {
                format!("{invalid} field(s) need attention.")
            };
            surface_event(model, message, false);
        }
        Msg::DismissError => model.error = None,
        Msg::Fields(TemplateFieldsMsg { field_name, change }) => {
            let attribute = model
                .template
                .as_ref()
                .and_then(|template| template.find_attribute(&field_name));
            match attribute {
                Some(attribute) => apply_change(&mut model.form, attribute, change),
                None => debug!(field = %field_name, "change for a field outside the template"),
            }
        }
    }

    settle(model);
}

/// Bring the form store in line with the current template and item.
fn settle(model: &mut AppModel) {
    model
        .groups
        .sync(&mut model.form, model.template.as_ref(), model.item.as_ref());
    model.groups.derive(&mut model.form, model.template.as_ref());
}

/// Execute a command synchronously and return the resulting message.
pub fn run_command(cmd: Command) -> Msg {
    match cmd {
        Command::PickFile(document) => {
            let file = rfd::FileDialog::new()
                .set_title(document.dialog_title())
                .add_filter("JSON", &["json"])
                .pick_file();
            match file {
                Some(path) => load_document(document, path),
                None => Msg::LoadCancelled(document),
            }
        }
        Command::LoadFile { document, path } => load_document(document, path),
    }
}

fn load_document(document: Document, path: PathBuf) -> Msg {
    let loaded = match document {
        Document::Template => load_template(&path).map(|template| Msg::TemplateLoaded {
            template,
            source: path.clone(),
        }),
        Document::Item => load_item(&path).map(|item| Msg::ItemLoaded {
            item,
            source: path.clone(),
        }),
        Document::Permissions => load_permissions(&path).map(|permissions| {
            Msg::PermissionsLoaded {
                permissions,
                source: path.clone(),
            }
        }),
    };

    loaded.unwrap_or_else(|err| Msg::LoadFailed {
        document,
        error: format!("{err:#}"),
    })
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Read and parse a product template file.
pub fn load_template(path: &Path) -> Result<ProductTemplate> {
    let template = parse_template(&read(path)?)
        .with_context(|| format!("parsing template {}", path.display()))?;
    info!(template = %template.name, path = %path.display(), "template loaded");
    Ok(template)
}

/// Read an item file. The root must be a JSON object keyed by form field name.
pub fn load_item(path: &Path) -> Result<Value> {
    let item: Value = serde_json::from_str(&read(path)?)
        .with_context(|| format!("parsing item {}", path.display()))?;
    if !item.is_object() {
        bail!("item {} must be a JSON object", path.display());
    }
    Ok(item)
}

pub fn load_permissions(path: &Path) -> Result<FormattedPermissions> {
    parse_permissions(&read(path)?).with_context(|| format!("parsing permissions {}", path.display()))
}

/// Update status/error fields consistently for user feedback.
fn surface_event(model: &mut AppModel, message: String, is_error: bool) {
    if is_error {
        model.error = Some(message.clone());
    }
    model.status = Some(message);
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;
    use crate::fields::mapper::{FieldChange, MapperContext, map_field};
    use crate::fields::predicates::REQUIRED_AT_VALIDATION_MESSAGE;
    use crate::form::REQUIRED_MESSAGE;
    use serde_json::json;
    use tempfile::TempDir;

    const TEMPLATE: &str = r#"{
        "name": "Fish",
        "groups": [
            {
                "name": "origin",
                "attributes": [
                    {
                        "code": "CATCH_AREA",
                        "fieldName": "catch_area",
                        "label": "Catch area",
                        "fieldType": "MULTI_SELECT",
                        "requiredAtCreation": true,
                        "values": [{ "value": 1, "label": "North" }, { "value": 2, "label": "South" }]
                    },
                    {
                        "code": "ZONE",
                        "fieldName": "zone",
                        "label": "Zone",
                        "fieldType": "SINGLE_SELECT",
                        "relatedFieldName": "catch_area",
                        "values": [{ "value": 7, "label": "Zone 7" }]
                    }
                ]
            }
        ]
    }"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn dispatch(model: &mut AppModel, msg: Msg) -> Vec<Command> {
        let mut cmds = Vec::new();
        update(model, msg, &mut cmds);
        cmds
    }

    fn load(model: &mut AppModel, document: Document, path: PathBuf) {
        let msg = run_command(Command::LoadFile { document, path });
        dispatch(model, msg);
    }

    #[test]
    fn open_request_enqueues_picker() {
        let mut model = AppModel::default();
        let cmds = dispatch(&mut model, Msg::OpenRequested(Document::Item));
        assert_eq!(cmds, vec![Command::PickFile(Document::Item)]);
    }

    #[test]
    fn loading_a_template_registers_its_fields() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();

        load(&mut model, Document::Template, write(&tmp, "t.json", TEMPLATE));

        assert!(model.error.is_none());
        assert!(model.status.as_deref().unwrap().contains("'Fish'"));
        assert!(model.form.is_registered("catchArea"));
        assert!(model.form.is_registered("zone"));
    }

    #[test]
    fn item_values_seed_the_form_without_dirtying() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();

        load(&mut model, Document::Template, write(&tmp, "t.json", TEMPLATE));
        load(
            &mut model,
            Document::Item,
            write(&tmp, "i.json", r#"{ "catchArea": 2 }"#),
        );

        assert_eq!(model.form.value("catchArea"), Some(&json!(2)));
        assert!(!model.form.is_dirty("catchArea"));
    }

    #[test]
    fn field_changes_flow_into_the_store_and_derive_dependents() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();
        load(&mut model, Document::Template, write(&tmp, "t.json", TEMPLATE));

        dispatch(
            &mut model,
            Msg::Fields(TemplateFieldsMsg {
                field_name: "catch_area".into(),
                change: FieldChange::Value(json!([1])),
            }),
        );

        assert_eq!(model.form.value("catchArea"), Some(&json!([1])));
        assert!(model.form.is_dirty("catchArea"));
        assert_eq!(model.form.value("zone"), Some(&json!(1)));
    }

    #[test]
    fn colliding_field_names_are_reported_in_the_status() {
        let mut model = AppModel::default();
        let template = parse_template(
            r#"{"name":"Dup","groups":[{"name":"g","attributes":[
                {"code":"A","fieldName":"net_weight","label":"A","fieldType":"INPUT"},
                {"code":"B","fieldName":"netWeight","label":"B","fieldType":"INPUT"}
            ]}]}"#,
        )
        .unwrap();

        dispatch(
            &mut model,
            Msg::TemplateLoaded {
                template,
                source: PathBuf::from("dup.json"),
            },
        );

        assert!(model.status.as_deref().unwrap().contains("1 field name collision(s)"));
        assert!(model.error.is_none());
    }

    #[test]
    fn validation_phase_toggles_required_at_validation_warnings() {
        let mut model = AppModel::default();
        let template = parse_template(
            r#"{"name":"Lot","groups":[{"name":"g","attributes":[
                {"code":"W","fieldName":"net_weight","label":"Weight","fieldType":"INPUT_NUMBER",
                 "requiredAtValidation":true}
            ]}]}"#,
        )
        .unwrap();
        dispatch(
            &mut model,
            Msg::TemplateLoaded {
                template,
                source: PathBuf::from("lot.json"),
            },
        );

        let warning = |model: &AppModel| {
            let template = model.template.as_ref().unwrap();
            let attribute = template.find_attribute("net_weight").unwrap();
            let ctx = MapperContext {
                template: Some(template),
                permission: None,
                is_validation: model.is_validation,
                fluid: false,
                product_id: None,
                locale: &model.locale,
            };
            map_field(attribute, &model.form, &ctx)
                .unwrap()
                .warning_message
        };

        assert_eq!(warning(&model), None);
        dispatch(&mut model, Msg::SetValidation(true));
        assert_eq!(warning(&model), Some(REQUIRED_AT_VALIDATION_MESSAGE));

        dispatch(
            &mut model,
            Msg::Fields(TemplateFieldsMsg {
                field_name: "net_weight".into(),
                change: FieldChange::Value(json!(12.5)),
            }),
        );
        assert_eq!(warning(&model), None);
    }

    #[test]
    fn changes_for_unknown_fields_are_ignored() {
        let mut model = AppModel::default();
        dispatch(
            &mut model,
            Msg::Fields(TemplateFieldsMsg {
                field_name: "ghost".into(),
                change: FieldChange::Value(json!("boo")),
            }),
        );
        assert_eq!(model.form.value("ghost"), None);
    }

    #[test]
    fn check_form_reports_missing_required_values() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();
        load(&mut model, Document::Template, write(&tmp, "t.json", TEMPLATE));

        dispatch(&mut model, Msg::CheckForm);

        assert_eq!(model.status.as_deref(), Some("1 field(s) need attention."));
        assert_eq!(
            model.form.error("catchArea").map(|e| e.message.as_str()),
            Some(REQUIRED_MESSAGE)
        );
    }

    #[test]
    fn clearing_the_item_reregisters_from_scratch() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();
        load(&mut model, Document::Template, write(&tmp, "t.json", TEMPLATE));
        load(
            &mut model,
            Document::Item,
            write(&tmp, "i.json", r#"{ "catchArea": [2] }"#),
        );
        assert_eq!(model.form.value("catchArea"), Some(&json!([2])));

        dispatch(&mut model, Msg::ClearItem);

        assert!(model.item.is_none());
        assert_eq!(model.form.value("catchArea"), None);
    }

    #[test]
    fn non_object_items_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();

        load(&mut model, Document::Item, write(&tmp, "i.json", "[1, 2]"));

        assert!(model.item.is_none());
        assert!(model.error.as_deref().unwrap().contains("must be a JSON object"));
    }

    #[test]
    fn unknown_field_types_surface_as_errors() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();
        let broken = TEMPLATE.replace("\"SINGLE_SELECT\"", "\"SLIDER\"");

        load(&mut model, Document::Template, write(&tmp, "t.json", &broken));

        assert!(model.template.is_none());
        let error = model.error.as_deref().unwrap();
        assert!(error.starts_with("Failed to load template"));
        assert!(error.contains("SLIDER"));
    }

    #[test]
    fn missing_files_surface_as_errors() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();

        load(&mut model, Document::Permissions, tmp.path().join("absent.json"));

        assert!(model.permissions.is_none());
        assert!(model.error.as_deref().unwrap().contains("reading"));

        dispatch(&mut model, Msg::DismissError);
        assert!(model.error.is_none());
    }

    #[test]
    fn permissions_load_and_attach() {
        let tmp = TempDir::new().unwrap();
        let mut model = AppModel::default();
        let path = write(
            &tmp,
            "p.json",
            r#"{ "attributes": { "zone": { "enabled": false, "visible": true } } }"#,
        );

        load(&mut model, Document::Permissions, path);

        let permissions = model.permissions.as_ref().unwrap();
        assert_eq!(permissions.attribute("zone").map(|p| p.enabled), Some(false));
    }

    #[test]
    fn cancelled_load_sets_status_only() {
        let mut model = AppModel::default();
        let cmds = dispatch(&mut model, Msg::LoadCancelled(Document::Template));
        assert!(cmds.is_empty());
        assert_eq!(model.status.as_deref(), Some("Opening template cancelled."));
        assert!(model.error.is_none());
    }

    #[test]
    fn startup_commands_follow_config_paths() {
        let config = AppConfig {
            template: Some(PathBuf::from("t.json")),
            permissions: Some(PathBuf::from("p.json")),
            ..Default::default()
        };
        assert_eq!(
            startup_commands(&config),
            vec![
                Command::LoadFile {
                    document: Document::Template,
                    path: PathBuf::from("t.json")
                },
                Command::LoadFile {
                    document: Document::Permissions,
                    path: PathBuf::from("p.json")
                },
            ]
        );
    }

    #[test]
    fn model_starts_from_config_flags() {
        let config = AppConfig {
            validation: true,
            panel: true,
            locale: "de".into(),
            ..Default::default()
        };
        let model = AppModel::from_config(&config);
        assert!(model.is_validation);
        assert_eq!(model.layout_mode, LayoutMode::Panel);
        assert_eq!(model.locale, "de");
    }
}
