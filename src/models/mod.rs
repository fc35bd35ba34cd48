// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Domain layer: template and permission types shared between form logic and UI.

pub mod permissions;
pub mod template;
