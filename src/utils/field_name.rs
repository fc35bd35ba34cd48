// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Normalize raw template attribute keys into form field identifiers.

use std::collections::BTreeMap;

use convert_case::{Case, Casing};

/// Convert a raw attribute key (e.g. `fishing_method_id`) into the camel-case
/// form field identifier used as the key in the form store (`fishingMethodId`).
///
/// Keys that are already camel-case pass through unchanged. Any character that is not
/// a letter or digit separates words (`dlc_j+3` becomes `dlcJ3`). Empty input stays empty.
pub fn normalize_field_name(raw: &str) -> String {
    let words: Vec<&str> = raw
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    if words.is_empty() {
        return String::new();
    }
    words.join("_").to_case(Case::Camel)
}

/// Normalize an optional raw key, treating `None` and blank strings as absent.
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.map(normalize_field_name).filter(|name| !name.is_empty())
}

/// A normalized identifier that more than one raw key maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NameCollision {
    pub normalized: String,
    pub raw: Vec<String>,
}

/// Report every normalized name shared by two or more distinct raw keys, or by
/// the same raw key declared twice.
///
/// Collisions are not rejected: later registrations simply overwrite the shared
/// form value. Callers log them so template authors can fix the data.
pub fn find_collisions<'a, I>(raw_names: I) -> Vec<NameCollision>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut by_normalized: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for raw in raw_names {
        let normalized = normalize_field_name(raw);
        if normalized.is_empty() {
            continue;
        }
        by_normalized
            .entry(normalized)
            .or_default()
            .push(raw.to_string());
    }

    by_normalized
        .into_iter()
        .filter(|(_, raw)| raw.len() > 1)
        .map(|(normalized, raw)| NameCollision { normalized, raw })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snake_case_keys_become_camel_case() {
        assert_eq!(normalize_field_name("fishing_method_id"), "fishingMethodId");
        assert_eq!(normalize_field_name("label_ids"), "labelIds");
    }

    #[test]
    fn punctuation_separates_words_and_is_dropped() {
        assert_eq!(normalize_field_name("dlc_j+3"), "dlcJ3");
        assert_eq!(normalize_field_name("net-weight"), "netWeight");
        assert_eq!(normalize_field_name("net weight (kg)"), "netWeightKg");
        assert_eq!(normalize_field_name("+-"), "");
    }

    #[test]
    fn camel_case_keys_are_unchanged() {
        assert_eq!(normalize_field_name("inputNumber"), "inputNumber");
        assert_eq!(normalize_field_name("input"), "input");
    }

    #[test]
    fn blank_optional_keys_are_absent() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("")), None);
        assert_eq!(normalize_optional(Some("  ")), None);
        assert_eq!(
            normalize_optional(Some("unit_select")),
            Some("unitSelect".to_string())
        );
    }

    // Distinct raw keys that normalize to the same identifier are reported together.
    #[test]
    fn collisions_group_raw_keys_by_identifier() {
        let collisions = find_collisions(["variety_id", "varietyId", "quality"]);
        assert_eq!(collisions.len(), 1);
        assert_eq!(collisions[0].normalized, "varietyId");
        assert_eq!(collisions[0].raw, vec!["variety_id", "varietyId"]);
    }

    #[test]
    fn unique_keys_report_no_collision() {
        assert!(find_collisions(["a_b", "c_d", ""]).is_empty());
    }
}
