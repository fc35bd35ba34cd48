// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Shared helper utilities reused by UI and form logic.

pub mod field_name;
