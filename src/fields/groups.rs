// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Template-wide field lifecycle: registration against the form store, layout of
//! groups into cards or panel sections, and dependent-field derivations.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::fields::mapper::auto_select;
use crate::fields::predicates::{VALIDATE_NOT_DIRTY, required_rule};
use crate::form::{FormStore, Rule, Subscription};
use crate::models::permissions::{FormattedPermission, FormattedPermissions};
use crate::models::template::{ProductTemplate, ProductTemplateAttribute};

/// Register every field of a template, seeding values from the item.
///
/// Each name is unregistered first so bindings left over from a previous template
/// never survive a swap. Seeded values are validated but not marked dirty.
pub fn register_template(store: &mut FormStore, template: &ProductTemplate, item: Option<&Value>) {
    for attribute in template.attributes() {
        let rules = if attribute.required_at_creation {
            vec![required_rule(attribute.field_type)]
        } else {
            Vec::new()
        };

        let name = attribute.form_field_name();
        register_one(store, &name, &rules, item);
        if let Some(select_name) = attribute.select_field_name() {
            register_one(store, &select_name, &rules, item);
        }
    }

    debug!(
        template = %template.name,
        fields = template.attributes().count(),
        "registered template fields"
    );
}

fn register_one(
    store: &mut FormStore,
    name: &str,
    rules: &[Rule],
    item: Option<&Value>,
) {
    store.unregister(name);
    store.register(name, rules);

    let seeded = item
        .and_then(|item| item.get(name))
        .filter(|value| !value.is_null());
    if let Some(value) = seeded {
        store.set_value(name, value.clone(), VALIDATE_NOT_DIRTY);
    }
}

/// Lifecycle state of the rendered template.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupsModel {
    registered: Option<(ProductTemplate, Option<Value>)>,
    /// Per dependent field, a subscription on the field it depends on.
    observed: BTreeMap<String, Subscription>,
}

impl GroupsModel {
    /// Re-register the template when `(item, template)` differs by value from the
    /// last registered pair. Returns whether a registration happened.
    pub fn sync(
        &mut self,
        store: &mut FormStore,
        template: Option<&ProductTemplate>,
        item: Option<&Value>,
    ) -> bool {
        let Some(template) = template else {
            self.registered = None;
            self.observed.clear();
            return false;
        };

        let unchanged = self
            .registered
            .as_ref()
            .is_some_and(|(t, i)| t == template && i.as_ref() == item);
        if unchanged {
            return false;
        }

        for collision in template.name_collisions() {
            warn!(
                field = %collision.normalized,
                raw = ?collision.raw,
                "template attributes share a form field name; values will overwrite each other"
            );
        }

        register_template(store, template, item);
        self.registered = Some((template.clone(), item.cloned()));
        self.observed.clear();
        info!(template = %template.name, "template fields (re)registered");
        true
    }

    /// Run the auto-select derivation for every dependent field until a pass
    /// makes no writes. Returns the number of writes.
    pub fn derive(&mut self, store: &mut FormStore, template: Option<&ProductTemplate>) -> usize {
        let Some(template) = template else {
            return 0;
        };

        let dependents: Vec<&ProductTemplateAttribute> = template
            .attributes()
            .filter(|attribute| attribute.related_field_name().is_some())
            .collect();

        let mut writes = 0;
        for _ in 0..=dependents.len() {
            let mut pass_writes = 0;
            for attribute in &dependents {
                if self.related_changed(store, attribute) && auto_select(store, attribute) {
                    pass_writes += 1;
                }
            }
            writes += pass_writes;
            if pass_writes == 0 {
                break;
            }
        }
        writes
    }

    /// Whether the field `attribute` depends on was written since the last check.
    /// A dependent seen for the first time counts as changed.
    fn related_changed(&mut self, store: &FormStore, attribute: &ProductTemplateAttribute) -> bool {
        let Some(related_name) = attribute.related_field_name() else {
            return false;
        };
        match self.observed.get_mut(&attribute.form_field_name()) {
            Some(subscription) => subscription.poll(store),
            None => {
                self.observed.insert(
                    attribute.form_field_name(),
                    store.subscribe(&[related_name.as_str()]),
                );
                true
            }
        }
    }
}

/// How groups are laid out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// One bordered card per group with a title and a wrapping row of fields.
    #[default]
    Card,
    /// One labeled subsection per group with fields stacked vertically.
    Panel,
}

/// One attribute placed in a section, with its permission lookup resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SectionField<'a> {
    pub attribute: &'a ProductTemplateAttribute,
    pub permission: Option<&'a FormattedPermission>,
}

/// One group's card or panel section.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSection<'a> {
    /// Group name; doubles as the section key, so it must be unique in the template.
    pub key: &'a str,
    pub card_test_id: String,
    pub fields: Vec<SectionField<'a>>,
}

/// Structural layout of a template.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupsLayout<'a> {
    pub mode: LayoutMode,
    /// Fields stretch to the available width (panel mode only).
    pub fluid: bool,
    pub sections: Vec<GroupSection<'a>>,
}

/// Lay out a template's groups. `None` when there is nothing to render.
pub fn layout<'a>(
    template: Option<&'a ProductTemplate>,
    permissions: Option<&'a FormattedPermissions>,
    mode: LayoutMode,
) -> Option<GroupsLayout<'a>> {
    let template = template.filter(|template| !template.groups.is_empty())?;

    let sections = template
        .groups
        .iter()
        .map(|group| GroupSection {
            key: &group.name,
            card_test_id: format!("{}-card", group.name),
            fields: group
                .attributes
                .iter()
                .map(|attribute| SectionField {
                    attribute,
                    permission: permissions
                        .and_then(|p| p.attribute(&attribute.form_field_name())),
                })
                .collect(),
        })
        .collect();

    Some(GroupsLayout {
        mode,
        fluid: mode == LayoutMode::Panel,
        sections,
    })
}
