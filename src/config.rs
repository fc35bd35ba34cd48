// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Runtime configuration derived from CLI flags and environment variables.

use std::path::PathBuf;

use clap::Parser;

use crate::fields::groups::LayoutMode;
use crate::models::template::Id;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "template-fields",
    version,
    about = "Render product data-entry forms from declarative templates"
)]
pub struct AppConfig {
    /// Product template JSON to open on startup.
    #[arg(long, env = "TEMPLATE_FIELDS_TEMPLATE")]
    pub template: Option<PathBuf>,

    /// Item JSON whose keys seed initial field values.
    #[arg(long, env = "TEMPLATE_FIELDS_ITEM")]
    pub item: Option<PathBuf>,

    /// Field permissions JSON.
    #[arg(long, env = "TEMPLATE_FIELDS_PERMISSIONS")]
    pub permissions: Option<PathBuf>,

    /// Product identifier passed to catalog-backed selectors.
    #[arg(long)]
    pub product_id: Option<String>,

    /// Locale edited by translated inputs.
    #[arg(long, env = "TEMPLATE_FIELDS_LOCALE", default_value = "en")]
    pub locale: String,

    /// Start in the validation phase.
    #[arg(long)]
    pub validation: bool,

    /// Start with the panel layout instead of cards.
    #[arg(long)]
    pub panel: bool,

    /// Tracing filter directive (e.g. `debug`, `template_fields=trace`).
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            template: None,
            item: None,
            permissions: None,
            product_id: None,
            locale: "en".to_string(),
            validation: false,
            panel: false,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Numeric ids stay numeric so they compare equal to API ids.
    pub fn product_id(&self) -> Option<Id> {
        let raw = self.product_id.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }
        Some(
            raw.parse::<i64>()
                .map(Id::Number)
                .unwrap_or_else(|_| Id::Text(raw.to_string())),
        )
    }

    pub fn layout_mode(&self) -> LayoutMode {
        if self.panel {
            LayoutMode::Panel
        } else {
            LayoutMode::Card
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let config = AppConfig::try_parse_from([
            "template-fields",
            "--template",
            "fish.json",
            "--product-id",
            "42",
            "--locale",
            "fr",
            "--validation",
            "--panel",
        ])
        .unwrap();
        assert_eq!(config.template, Some(PathBuf::from("fish.json")));
        assert_eq!(config.product_id(), Some(Id::Number(42)));
        assert_eq!(config.locale, "fr");
        assert!(config.validation);
        assert_eq!(config.layout_mode(), LayoutMode::Panel);
    }

    #[test]
    fn non_numeric_product_ids_are_kept_as_text() {
        let config = AppConfig {
            product_id: Some("sku-7".into()),
            ..Default::default()
        };
        assert_eq!(config.product_id(), Some(Id::Text("sku-7".into())));

        let blank = AppConfig {
            product_id: Some(" ".into()),
            ..Default::default()
        };
        assert_eq!(blank.product_id(), None);
    }

    #[test]
    fn defaults_to_card_layout() {
        assert_eq!(AppConfig::default().layout_mode(), LayoutMode::Card);
    }
}
