use eframe::egui;

use crate::app::app_core::MovementGaugeApp;
use crate::gauge;
use crate::utils;

pub fn render_main_panel(app: &mut MovementGaugeApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(8.0);
            ui.heading(app.state.gauge_title());

            // 数值文本与指针驱动同源,保留两位小数
            let value = app.state.display_value();
            ui.label(
                egui::RichText::new(format!("{:.2}", utils::round_half_up(value, 2)))
                    .size(34.0)
                    .strong(),
            );
            ui.add_space(6.0);

            let config = app.config.get_config();
            let face = if app.state.display.cumulative_mode {
                config.gauge.colors.face_cumulative
            } else {
                config.gauge.colors.face_instantaneous
            };
            gauge::render_gauge(
                ui,
                &mut app.state.needle,
                &config.gauge,
                egui::Color32::from_rgb(face[0], face[1], face[2]),
            );

            if !app.state.display.status_message.is_empty() {
                ui.add_space(6.0);
                ui.colored_label(
                    egui::Color32::from_rgb(0, 100, 200),
                    &app.state.display.status_message,
                );
            }
        });
    });
}
