use std::time::Duration;

use eframe::{egui, Frame};
use log::info;

use super::state::AppState;
use crate::config::ConfigManager;
use crate::gauge::NeedleAnimator;
use crate::types::{Reading, SessionCommand};

pub struct MovementGaugeApp {
    // 统一的状态管理
    pub state: AppState,

    // 配置管理
    pub config: ConfigManager,
}

impl MovementGaugeApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        display_receiver: crossbeam_channel::Receiver<Reading>,
        command_sender: crossbeam_channel::Sender<SessionCommand>,
        config: ConfigManager,
        source_label: Option<String>,
    ) -> Self {
        // 指针动画直接向 egui 申请重绘帧
        let needle = NeedleAnimator::new(
            &config.get_config().gauge,
            Box::new(cc.egui_ctx.clone()),
        );

        let state = AppState::new(display_receiver, command_sender, needle, source_label);

        info!("应用启动，表盘就绪，等待读数...");

        MovementGaugeApp { state, config }
    }
}

impl eframe::App for MovementGaugeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // 设置明亮模式主题
        ctx.set_visuals(egui::Visuals::light());

        // 渲染UI组件
        crate::app::ui::render_status_bar(self, ctx);
        crate::app::ui::render_main_panel(self, ctx);

        // 消化会话线程送来的读数
        self.handle_display_updates();

        ctx.request_repaint_after(Duration::from_millis(120));
    }
}
