// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Reusable egui components structured for MVU-style updates.

pub mod date_field;
pub mod template_fields;
pub mod toggle;

pub use toggle::toggle_switch;
