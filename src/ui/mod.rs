// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for filling in a templated product form.
//! Handles layout, document loading controls, and wiring to the form renderer.

pub mod components;

use eframe::egui;
use egui_phosphor::regular as icons;

use crate::config::AppConfig;
use crate::fields::groups::{LayoutMode, layout};
use crate::mvu::{self, AppModel, Command, Document, Msg};
use crate::ui::components::template_fields::{self, ViewContext};

/// Stateful egui application rendering a product template as a form.
pub struct TemplateFieldsApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl TemplateFieldsApp {
    pub fn new(config: &AppConfig) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        let mut app = Self {
            model: AppModel::from_config(config),
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        };
        app.dispatch(mvu::startup_commands(config));
        app
    }

    fn dispatch(&mut self, commands: Vec<Command>) {
        for cmd in commands {
            if self.cmd_tx.send(cmd).is_ok() {
                self.model.pending_commands += 1;
            }
        }
    }
}

impl eframe::App for TemplateFieldsApp {
    /// Drain worker results, apply queued messages, then render one frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_spacing(ctx);

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        // Field changes depend on arrival order, so apply FIFO.
        for msg in std::mem::take(&mut self.inbox) {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            self.dispatch(commands);
        }
        if self.model.pending_commands > 0 {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading(self.title());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    self.render_theme_controls(ui);
                    ui.separator();
                    self.render_mode_controls(ui);
                    ui.separator();
                    self.render_open_buttons(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_form(ui);
                ui.add_space(12.0);
                self.render_values_preview(ui);
                ui.add_space(8.0);
            });
        });

        if !self.inbox.is_empty() {
            ctx.request_repaint();
        }
    }
}

impl TemplateFieldsApp {
    fn ensure_spacing(&self, ctx: &egui::Context) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });
    }

    fn title(&self) -> String {
        match &self.model.template {
            Some(template) => template.name.clone(),
            None => "Product form".to_string(),
        }
    }

    fn render_theme_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(2.0);
        egui::widgets::global_theme_preference_switch(ui);
    }

    /// Validation phase, layout switch and the explicit form check.
    fn render_mode_controls(&mut self, ui: &mut egui::Ui) {
        let has_template = self.model.template.is_some();
        if ui
            .add_enabled(
                has_template,
                egui::Button::new(format!("{} Check form", icons::CHECK_CIRCLE)),
            )
            .on_hover_text("Validate every registered field")
            .clicked()
        {
            self.inbox.push(Msg::CheckForm);
        }

        let mut mode = self.model.layout_mode;
        ui.selectable_value(&mut mode, LayoutMode::Panel, format!("{} Panel", icons::ROWS));
        ui.selectable_value(&mut mode, LayoutMode::Card, format!("{} Cards", icons::SQUARES_FOUR));
        if mode != self.model.layout_mode {
            self.inbox.push(Msg::SetLayout(mode));
        }

        let mut validation = self.model.is_validation;
        if ui
            .checkbox(&mut validation, "Validation phase")
            .on_hover_text("Show warnings and hide fields not displayed at validation")
            .changed()
        {
            self.inbox.push(Msg::SetValidation(validation));
        }
    }

    fn render_open_buttons(&mut self, ui: &mut egui::Ui) {
        if ui
            .add_enabled(
                self.model.item.is_some(),
                egui::Button::new(format!("{} Clear item", icons::ERASER)),
            )
            .clicked()
        {
            self.inbox.push(Msg::ClearItem);
        }
        let buttons = [
            (Document::Permissions, icons::LOCK_KEY, "Permissions"),
            (Document::Item, icons::PACKAGE, "Item"),
            (Document::Template, icons::FILE_TEXT, "Template"),
        ];
        for (document, icon, label) in buttons {
            if ui.button(format!("{icon} {label}")).clicked() {
                self.inbox.push(Msg::OpenRequested(document));
            }
        }
    }

    /// Render the loaded template, or a hint when there is nothing to show.
    fn render_form(&mut self, ui: &mut egui::Ui) {
        let model = &self.model;
        let Some(template) = model.template.as_ref() else {
            ui.label(
                egui::RichText::new("Open a product template to start.")
                    .color(egui::Color32::from_gray(110)),
            );
            return;
        };
        let Some(groups) = layout(Some(template), model.permissions.as_ref(), model.layout_mode)
        else {
            ui.label(
                egui::RichText::new("This template has no groups.")
                    .color(egui::Color32::from_gray(110)),
            );
            return;
        };

        let view_ctx = ViewContext {
            template,
            store: &model.form,
            is_validation: model.is_validation,
            product_id: model.product_id.as_ref(),
            locale: &model.locale,
        };
        let msgs = template_fields::view(ui, &groups, &view_ctx);
        self.inbox.extend(msgs.into_iter().map(Msg::Fields));
    }

    /// Read-only JSON of the current form values.
    fn render_values_preview(&self, ui: &mut egui::Ui) {
        if self.model.template.is_none() {
            return;
        }
        egui::CollapsingHeader::new(format!("{} Form values", icons::BRACKETS_CURLY))
            .default_open(false)
            .show(ui, |ui| {
                let text = serde_json::to_string_pretty(&self.model.form.values())
                    .unwrap_or_else(|err| format!("<unserializable: {err}>"));
                ui.add(
                    egui::TextEdit::multiline(&mut text.as_str())
                        .code_editor()
                        .desired_width(f32::INFINITY),
                );
            });
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Load error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status message and the invalid-field count.
    fn render_status(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if let Some(text) = &self.model.status {
                let display = if self.model.pending_commands > 0 {
                    format!("{}  ({} working…)", text, self.model.pending_commands)
                } else {
                    text.to_string()
                };
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
            }
            if self.model.pending_commands > 0 {
                ui.add(egui::Spinner::new().size(14.0)).on_hover_text(format!(
                    "{} task(s) running in background",
                    self.model.pending_commands
                ));
            }
            let errors = self.model.form.error_count();
            if errors > 0 {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(
                        ui.visuals().error_fg_color,
                        format!("{} {errors} invalid field(s)", icons::WARNING),
                    );
                });
            }
        });
    }
}
