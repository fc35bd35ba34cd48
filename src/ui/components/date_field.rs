// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Date and date-range pickers bound to template field values.
//!
//! Dates are stored as `YYYY-MM-DD` strings; ranges as a two-element array.

use chrono::{Local, NaiveDate};
use egui_extras::DatePickerButton;
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored date value.
pub fn parse_date(value: Option<&Value>) -> Option<NaiveDate> {
    value
        .and_then(Value::as_str)
        .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok())
}

pub fn format_date(date: NaiveDate) -> Value {
    Value::String(date.format(DATE_FORMAT).to_string())
}

/// Parse a stored `[start, end]` range. Missing bounds are `None`.
pub fn parse_range(value: Option<&Value>) -> (Option<NaiveDate>, Option<NaiveDate>) {
    match value.and_then(Value::as_array).map(Vec::as_slice) {
        Some([start, end, ..]) => (parse_date(Some(start)), parse_date(Some(end))),
        Some([start]) => (parse_date(Some(start)), None),
        _ => (None, None),
    }
}

/// Store a range, pulling the end forward when it precedes the start.
pub fn format_range(start: NaiveDate, end: NaiveDate) -> Value {
    let end = end.max(start);
    Value::Array(vec![format_date(start), format_date(end)])
}

/// Single date picker. Returns the new value when the user picks a date.
pub fn view_date(ui: &mut egui::Ui, id_salt: &str, value: Option<&Value>) -> Option<Value> {
    let mut date = parse_date(value).unwrap_or_else(today);
    let changed = ui
        .add(
            DatePickerButton::new(&mut date)
                .id_salt(id_salt)
                .show_icon(true),
        )
        .changed();
    changed.then(|| format_date(date))
}

/// Start/end date pickers. Returns the new range when either bound changes.
pub fn view_range(ui: &mut egui::Ui, id_salt: &str, value: Option<&Value>) -> Option<Value> {
    let (start, end) = parse_range(value);
    let mut start = start.unwrap_or_else(today);
    let mut end = end.unwrap_or(start);
    let mut changed = false;

    ui.horizontal(|ui| {
        changed |= ui
            .add(
                DatePickerButton::new(&mut start)
                    .id_salt(&format!("{id_salt}-start"))
                    .show_icon(true),
            )
            .changed();
        ui.label(egui_phosphor::regular::ARROW_RIGHT);
        changed |= ui
            .add(
                DatePickerButton::new(&mut end)
                    .id_salt(&format!("{id_salt}-end"))
                    .show_icon(true),
            )
            .changed();
    });

    changed.then(|| format_range(start, end))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_stored_dates() {
        assert_eq!(parse_date(Some(&json!("2024-06-15"))), Some(date(2024, 6, 15)));
        assert_eq!(parse_date(Some(&json!("15/06/2024"))), None);
        assert_eq!(parse_date(Some(&json!(20240615))), None);
        assert_eq!(parse_date(None), None);
    }

    #[test]
    fn formats_dates_as_iso() {
        assert_eq!(format_date(date(2024, 1, 5)), json!("2024-01-05"));
    }

    #[test]
    fn parses_partial_ranges() {
        assert_eq!(
            parse_range(Some(&json!(["2024-01-01", "2024-01-31"]))),
            (Some(date(2024, 1, 1)), Some(date(2024, 1, 31)))
        );
        assert_eq!(
            parse_range(Some(&json!(["2024-01-01"]))),
            (Some(date(2024, 1, 1)), None)
        );
        assert_eq!(parse_range(Some(&json!("2024-01-01"))), (None, None));
    }

    #[test]
    fn range_end_never_precedes_start() {
        assert_eq!(
            format_range(date(2024, 3, 10), date(2024, 3, 1)),
            json!(["2024-03-10", "2024-03-10"])
        );
    }
}
