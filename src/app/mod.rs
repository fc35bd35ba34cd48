// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring tracing and egui/eframe to launch the form UI.

use anyhow::{Context, Result, anyhow};
use eframe::egui;
use egui_phosphor::Variant;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::ui::TemplateFieldsApp;

/// Install the global fmt subscriber filtered by the configured directive.
pub fn init_tracing(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log filter `{}`", config.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))
}

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(config: AppConfig) -> Result<()> {
    init_tracing(&config)?;
    info!(
        template = ?config.template,
        item = ?config.item,
        locale = %config.locale,
        "starting template form"
    );

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Template fields",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(TemplateFieldsApp::new(&config)))
        }),
    )
    .map_err(|err| anyhow!("event loop failed: {err}"))
}
