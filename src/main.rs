// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

mod app;
mod config;
mod fields;
mod form;
mod models;
mod mvu;
mod ui;
mod utils;

use clap::Parser;

fn main() -> anyhow::Result<()> {
    app::run(config::AppConfig::parse())
}
