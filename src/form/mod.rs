// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared form state: values, validation rules, dirty flags and errors keyed by field name.
//!
//! The store is owned by the application model and handed out by reference: views
//! read it through `&FormStore`, and only `update` paths mutate it. Every mutating
//! call bumps a revision counter so callers can detect changes without callbacks.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Message attached to a failed required rule.
pub const REQUIRED_MESSAGE: &str = "This field is required";

/// Validation rule attached to a registered field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rule {
    /// Value must be present and, for strings and collections, non-empty.
    Required,
    /// Value must be a non-empty collection.
    RequiredArray,
}

impl Rule {
    /// Check a value against the rule, returning the failure message.
    pub fn check(&self, value: Option<&Value>) -> Option<&'static str> {
        let ok = match self {
            Rule::Required => !is_empty_value(value),
            Rule::RequiredArray => matches!(value, Some(Value::Array(items)) if !items.is_empty()),
        };
        (!ok).then_some(REQUIRED_MESSAGE)
    }
}

/// Options controlling the side effects of [`FormStore::set_value`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SetValueConfig {
    pub should_dirty: bool,
    pub should_validate: bool,
}

/// Validation failure stored for a field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub message: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct FieldEntry {
    value: Option<Value>,
    rules: Vec<Rule>,
    registered: bool,
    dirty: bool,
    error: Option<FieldError>,
    revision: u64,
}

impl FieldEntry {
    fn validate(&self) -> Option<FieldError> {
        self.rules
            .iter()
            .find_map(|rule| rule.check(self.value.as_ref()))
            .map(|message| FieldError {
                message: message.to_string(),
            })
    }
}

/// A value is empty when absent, null, an empty string or an empty collection.
pub fn is_empty_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(items)) => items.is_empty(),
        Some(_) => false,
    }
}

/// Form value and validation store shared by every field of a form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormStore {
    fields: BTreeMap<String, FieldEntry>,
    revision: u64,
}

impl FormStore {
    /// Register a field with its rules. Keeps any existing value.
    pub fn register(&mut self, name: &str, rules: &[Rule]) {
        let revision = self.bump();
        let entry = self.fields.entry(name.to_string()).or_default();
        entry.rules = rules.to_vec();
        entry.registered = true;
        entry.revision = revision;
    }

    /// Drop a field binding together with its value, dirty flag and error.
    pub fn unregister(&mut self, name: &str) {
        if self.fields.remove(name).is_some() {
            self.bump();
        }
    }

    /// Write a value. Unknown names get an unregistered entry without rules.
    pub fn set_value(&mut self, name: &str, value: Value, config: SetValueConfig) {
        let revision = self.bump();
        let entry = self.fields.entry(name.to_string()).or_default();
        entry.value = Some(value);
        entry.revision = revision;
        if config.should_dirty {
            entry.dirty = true;
        }
        if config.should_validate {
            entry.error = entry.validate();
        }
    }

    /// Run every registered field's rules and store the results.
    ///
    /// Returns the number of invalid fields.
    pub fn validate_all(&mut self) -> usize {
        let mut invalid = 0;
        for entry in self.fields.values_mut().filter(|entry| entry.registered) {
            entry.error = entry.validate();
            if entry.error.is_some() {
                invalid += 1;
            }
        }
        invalid
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).and_then(|entry| entry.value.as_ref())
    }

    pub fn error(&self, name: &str) -> Option<&FieldError> {
        self.fields.get(name).and_then(|entry| entry.error.as_ref())
    }

    pub fn is_dirty(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|entry| entry.dirty)
    }

    #[cfg(test)]
    pub fn is_registered(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|entry| entry.registered)
    }

    #[cfg(test)]
    pub fn rules(&self, name: &str) -> &[Rule] {
        self.fields
            .get(name)
            .map(|entry| entry.rules.as_slice())
            .unwrap_or_default()
    }

    /// Current values of several fields at once, in the requested order.
    pub fn watch<'a>(&'a self, names: &[&str]) -> Vec<Option<&'a Value>> {
        names.iter().map(|name| self.value(name)).collect()
    }

    /// Snapshot of every field holding a value.
    pub fn values(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .filter_map(|(name, entry)| entry.value.clone().map(|value| (name.clone(), value)))
            .collect();
        Value::Object(map)
    }

    /// Number of fields currently holding an error.
    pub fn error_count(&self) -> usize {
        self.fields
            .values()
            .filter(|entry| entry.error.is_some())
            .count()
    }

    /// Capture the current state of some fields for later change detection.
    pub fn subscribe(&self, names: &[&str]) -> Subscription {
        Subscription {
            seen: names
                .iter()
                .map(|name| (name.to_string(), self.field_revision(name)))
                .collect(),
        }
    }

    fn field_revision(&self, name: &str) -> Option<u64> {
        self.fields.get(name).map(|entry| entry.revision)
    }

    fn bump(&mut self) -> u64 {
        self.revision += 1;
        self.revision
    }
}

/// Change detector over a fixed set of field names.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subscription {
    seen: Vec<(String, Option<u64>)>,
}

impl Subscription {
    /// Whether any watched field was written, registered or removed since the last check.
    pub fn has_changed(&self, store: &FormStore) -> bool {
        self.seen
            .iter()
            .any(|(name, revision)| store.field_revision(name) != *revision)
    }

    /// Like [`Subscription::has_changed`], then re-arm on the current state.
    pub fn poll(&mut self, store: &FormStore) -> bool {
        let changed = self.has_changed(store);
        for (name, revision) in self.seen.iter_mut() {
            *revision = store.field_revision(name);
        }
        changed
    }
}
