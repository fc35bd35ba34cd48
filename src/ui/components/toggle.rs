// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Toggle switch widget (adapted from egui demo) used by boolean template fields.

/// Draw a compact toggle switch. Clicking flips `on` unless the switch is disabled.
pub fn toggle_switch(ui: &mut egui::Ui, on: &mut bool) -> egui::Response {
    let enabled = ui.is_enabled();
    let spacing = ui.style().spacing.interact_size;
    let desired_size = egui::vec2(spacing.x.max(32.0), spacing.y.max(18.0));
    let sense = if enabled {
        egui::Sense::click()
    } else {
        egui::Sense::hover()
    };
    let (rect, mut response) = ui.allocate_exact_size(desired_size, sense);
    if enabled && response.clicked() {
        *on = !*on;
        response.mark_changed();
    }

    if ui.is_rect_visible(rect) {
        let how_on = ui.ctx().animate_bool(response.id, *on);
        let visuals = ui.style().interact_selectable(&response, *on);
        let rail_on = visuals.bg_fill;
        let rail_off = ui.visuals().widgets.inactive.bg_fill;
        let mut fill = lerp_color(rail_off, rail_on, how_on);
        if !enabled {
            fill = fill.gamma_multiply(0.5);
        }

        ui.painter()
            .rect_filled(rect.expand(visuals.expansion), rect.height() * 0.45, fill);

        let knob_x = egui::lerp((rect.left() + 8.0)..=(rect.right() - 8.0), how_on);
        let center = egui::pos2(knob_x, rect.center().y);
        ui.painter()
            .circle(center, 6.5, visuals.bg_fill, visuals.fg_stroke);
    }

    response
}

fn lerp_color(from: egui::Color32, to: egui::Color32, t: f32) -> egui::Color32 {
    let channel = |a: u8, b: u8| egui::lerp(a as f32..=b as f32, t) as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
        channel(from.a(), to.a()),
    )
}
