use chrono::Utc;
use egui::{Color32, FontId, Pos2, Sense, Stroke, Vec2};

use super::animator::{FrameScheduler, NeedleAnimator};
use crate::config::GaugeConfig;

/// egui 上下文即帧调度器:申请下一帧就是请求一次重绘
impl FrameScheduler for egui::Context {
    fn request_frame(&self) {
        self.request_repaint();
    }
}

/// 把刻度序号映射为表盘值:0 号刻度在正上方对应量程中点,顺时针递增,
/// 过半圈后折回负侧。一格等于两个表盘值。
fn nick_to_value(nick: u32, total_nicks: u32, center_degree: f64) -> f64 {
    let nick = nick as i64;
    let total = total_nicks as i64;
    let raw = if nick < total / 2 { nick } else { nick - total };
    raw as f64 * 2.0 + center_degree
}

/// 表盘值到旋转角:量程中点朝正上方,单位是相对 12 点钟的顺时针角度
fn value_to_angle(value: f64, center_degree: f64, degrees_per_nick: f64) -> f64 {
    (value - center_degree) / 2.0 * degrees_per_nick
}

fn angle_dir(angle_degrees: f64) -> Vec2 {
    let rad = angle_degrees.to_radians();
    Vec2::new(rad.sin() as f32, -rad.cos() as f32)
}

fn at(center: Pos2, dir: Vec2, distance: f64) -> Pos2 {
    center + dir * distance as f32
}

fn color32(rgb: [u8; 3]) -> Color32 {
    Color32::from_rgb(rgb[0], rgb[1], rgb[2])
}

/// 绘制表盘并推进指针动画。先按当前位置画出本帧,再推进运动学,
/// 后续帧由动画器按需申请。
pub fn render_gauge(
    ui: &mut egui::Ui,
    needle: &mut NeedleAnimator,
    config: &GaugeConfig,
    face_color: Color32,
) {
    let side = ui
        .available_width()
        .min(ui.available_height())
        .clamp(220.0, 460.0);
    let (response, painter) = ui.allocate_painter(Vec2::splat(side), Sense::hover());
    let center = response.rect.center();
    let radius = side as f64 * 0.5;

    painter.circle_filled(center, (radius * 0.95) as f32, face_color);

    let tick_color = color32(config.colors.ticks);
    let degrees_per_nick = 360.0 / config.total_nicks as f64;

    // 只画落在量程内的刻度,每 5 格一个长刻度加数字
    for nick in 0..config.total_nicks {
        let value = nick_to_value(nick, config.total_nicks, config.center_degree);
        if value < config.min_degrees || value > config.max_degrees {
            continue;
        }

        let dir = angle_dir(value_to_angle(value, config.center_degree, degrees_per_nick));
        let is_major = nick % 5 == 0;
        let inner = if is_major { radius * 0.80 } else { radius * 0.86 };
        painter.line_segment(
            [at(center, dir, inner), at(center, dir, radius * 0.91)],
            Stroke::new(if is_major { 2.0 } else { 1.0 }, tick_color),
        );

        if is_major {
            painter.text(
                at(center, dir, radius * 0.70),
                egui::Align2::CENTER_CENTER,
                format!("{:.0}", value),
                FontId::proportional((side * 0.05).max(11.0)),
                tick_color,
            );
        }
    }

    let position = needle.position();
    let dir = angle_dir(value_to_angle(
        position,
        config.center_degree,
        degrees_per_nick,
    ));
    painter.line_segment(
        [at(center, dir, -radius * 0.12), at(center, dir, radius * 0.78)],
        Stroke::new(3.0, color32(config.colors.needle)),
    );
    painter.circle_filled(center, (radius * 0.05) as f32, tick_color);

    needle.tick(Utc::now().timestamp_millis());
}
