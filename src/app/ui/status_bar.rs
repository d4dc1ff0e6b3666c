use eframe::egui;

use crate::app::app_core::MovementGaugeApp;
use crate::utils;

pub fn render_status_bar(app: &mut MovementGaugeApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("status_bar")
        .min_height(40.0)
        .show(ctx, |ui| {
            ui.add_space(5.0);
            ui.horizontal(|ui| {
                ui.label("Status:");

                let (status_text, status_color) = if app.state.display.source_label.is_none() {
                    ("Sensor unavailable", egui::Color32::from_rgb(150, 0, 0)) // 红色
                } else if app.state.display.last_reading.is_some() {
                    ("Sampling", egui::Color32::from_rgb(0, 150, 0)) // 绿色
                } else {
                    ("Waiting for data", egui::Color32::from_rgb(255, 165, 0)) // 橙色
                };
                ui.colored_label(status_color, status_text);

                ui.separator();

                // 模式切换
                ui.label("Mode:");
                let cumulative = app.state.display.cumulative_mode;
                if ui.selectable_label(!cumulative, "Instantaneous").clicked() {
                    app.set_cumulative_mode(false);
                }
                if ui.selectable_label(cumulative, "Cumulative").clicked() {
                    app.set_cumulative_mode(true);
                }

                // 重置按钮只在累计模式下出现
                if app.state.display.cumulative_mode {
                    ui.separator();
                    if ui.button("⟲ Reset").clicked() {
                        app.request_reset();
                    }
                }

                ui.separator();

                if let Some(label) = &app.state.display.source_label {
                    ui.label(format!("Source: {}", label));
                    ui.separator();
                }

                ui.label(format!("Samples: {}", app.state.display.samples_seen));

                // 最右侧显示最近一条读数的时间
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(reading) = app.state.display.last_reading {
                        ui.label(format!(
                            "Last update: {}",
                            utils::format_timestamp(reading.timestamp)
                        ));
                    }
                });
            });
            ui.add_space(5.0);
        });
}
