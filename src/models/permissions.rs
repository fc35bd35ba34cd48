// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Field-level permissions computed by the backend for the current user.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Visibility and edit rights for a single form field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedPermission {
    pub enabled: bool,
    pub visible: bool,
    #[serde(default)]
    pub disabled_reason: String,
}

/// Permissions keyed by normalized field name.
///
/// `actions` is passed through untouched; only `attributes` drive the form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormattedPermissions {
    #[serde(default)]
    pub actions: BTreeMap<String, Value>,
    #[serde(default)]
    pub attributes: BTreeMap<String, FormattedPermission>,
}

impl FormattedPermissions {
    /// Permission for a normalized field name. `None` means unrestricted.
    pub fn attribute(&self, form_field_name: &str) -> Option<&FormattedPermission> {
        self.attributes.get(form_field_name)
    }
}

/// Parse a permissions payload from JSON.
pub fn parse_permissions(json: &str) -> Result<FormattedPermissions> {
    serde_json::from_str(json).context("Failed to parse permissions JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_attribute_permissions() {
        let json = r#"{"actions":{"delete":true},"attributes":{"input":{"enabled":false,"visible":true,"disabledReason":"Locked"}}}"#;
        let permissions = parse_permissions(json).unwrap();
        let input = permissions.attribute("input").unwrap();
        assert!(!input.enabled);
        assert!(input.visible);
        assert_eq!(input.disabled_reason, "Locked");
        assert!(permissions.attribute("other").is_none());
        assert_eq!(permissions.actions.len(), 1);
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let permissions = parse_permissions("{}").unwrap();
        assert!(permissions.attributes.is_empty());
    }
}
