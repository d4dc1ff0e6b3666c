use crossbeam_channel::{Receiver, Sender};

use crate::gauge::NeedleAnimator;
use crate::types::{Reading, SessionCommand};

/// 应用状态管理模块
/// 显示状态与通道端点分开存放,渲染函数按需借用

/// 显示状态
#[derive(Debug, Clone)]
pub struct DisplayState {
    pub cumulative_mode: bool,
    pub last_reading: Option<Reading>,
    pub samples_seen: u64,
    pub status_message: String,
    pub source_label: Option<String>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            cumulative_mode: false,
            last_reading: None,
            samples_seen: 0,
            status_message: String::new(),
            source_label: None,
        }
    }
}

/// 数据通道端点
pub struct DataChannels {
    pub display_receiver: Receiver<Reading>,
    pub command_sender: Sender<SessionCommand>,
}

/// 统一的应用状态
pub struct AppState {
    pub display: DisplayState,
    pub channels: DataChannels,
    pub needle: NeedleAnimator,
}

impl AppState {
    /// 创建新的应用状态
    pub fn new(
        display_receiver: Receiver<Reading>,
        command_sender: Sender<SessionCommand>,
        needle: NeedleAnimator,
        source_label: Option<String>,
    ) -> Self {
        Self {
            display: DisplayState {
                source_label,
                ..DisplayState::default()
            },
            channels: DataChannels {
                display_receiver,
                command_sender,
            },
            needle,
        }
    }

    /// 当前模式下用于展示与驱动指针的数值
    pub fn display_value(&self) -> f64 {
        match self.display.last_reading {
            Some(reading) if self.display.cumulative_mode => reading.cumulative,
            Some(reading) => reading.instantaneous,
            None => 0.0,
        }
    }

    /// 表盘标题随模式切换
    pub fn gauge_title(&self) -> &'static str {
        if self.display.cumulative_mode {
            "Cumulative Movement"
        } else {
            "Instantaneous Movement"
        }
    }
}
