use log::{info, warn};

use super::app_core::MovementGaugeApp;
use crate::types::SessionCommand;

impl MovementGaugeApp {
    /// 排空显示通道,记下最新读数并驱动指针
    pub fn handle_display_updates(&mut self) {
        let mut received = false;
        while let Ok(reading) = self.state.channels.display_receiver.try_recv() {
            self.state.display.last_reading = Some(reading);
            self.state.display.samples_seen += 1;
            received = true;
        }

        if received {
            let value = self.state.display_value();
            self.state.needle.set_target(value);
        }
    }

    /// 切换瞬时/累计展示,立即用当前读数重新定标指针
    pub fn set_cumulative_mode(&mut self, enabled: bool) {
        if self.state.display.cumulative_mode == enabled {
            return;
        }
        self.state.display.cumulative_mode = enabled;
        let value = self.state.display_value();
        self.state.needle.set_target(value);
        info!("Display mode switched to {}", self.state.gauge_title());
    }

    /// 请求会话线程清零累计指标;显示值在下一条读数到达时跟进
    pub fn request_reset(&mut self) {
        match self
            .state
            .channels
            .command_sender
            .try_send(SessionCommand::ResetCumulative)
        {
            Ok(()) => {
                info!("Cumulative reset requested");
                self.state.display.status_message = "Reset requested".to_string();
            }
            Err(e) => {
                warn!("Reset command not delivered: {}", e);
                self.state.display.status_message =
                    "Sampling inactive, nothing to reset".to_string();
            }
        }
    }
}
