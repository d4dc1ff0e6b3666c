use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 应用配置管理模块
/// 集中管理所有配置项，提供默认值和配置验证

/// 主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub mqtt: MqttConfig,
    pub sampler: SamplerConfig,
    pub publisher: PublisherConfig,
    pub gauge: GaugeConfig,
    pub storage: StorageConfig,
    pub channels: ChannelConfig,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub resizable: bool,
    pub vsync: bool,
    pub hardware_acceleration: bool,
}

/// MQTT配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MqttConfig {
    pub broker: String,
    pub port: u16,
    pub client_id: String,
    pub topic: String,
    pub qos: u8,
    pub keep_alive: u16,
}

/// 采样源配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    pub source: String,
    pub rate_hz: f64,
    pub amplitude: f64,
    pub noise: f64,
    pub replay_path: String,
}

/// 批量发布配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    pub low_send_secs: u32,
    pub high_send_secs: u32,
    pub max_queue_len: usize,
}

/// 表盘配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaugeConfig {
    pub min_degrees: f64,
    pub max_degrees: f64,
    pub center_degree: f64,
    pub total_nicks: u32,
    pub colors: GaugeColors,
}

/// 表盘颜色配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GaugeColors {
    pub face_instantaneous: [u8; 3],
    pub face_cumulative: [u8; 3],
    pub needle: [u8; 3],
    pub ticks: [u8; 3],
}

/// 状态持久化配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub state_path: String,
    pub auto_create_dir: bool,
}

/// 通道配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub event_channel_capacity: usize,
    pub display_channel_capacity: usize,
    pub command_channel_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            mqtt: MqttConfig::default(),
            sampler: SamplerConfig::default(),
            publisher: PublisherConfig::default(),
            gauge: GaugeConfig::default(),
            storage: StorageConfig::default(),
            channels: ChannelConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 640.0,
            title: "MovementGauge - Motion Monitor".to_string(),
            resizable: true,
            vsync: true,
            hardware_acceleration: true,
        }
    }
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker: "localhost".to_string(),
            port: 1883,
            client_id: "movement_gauge_client".to_string(),
            topic: "accelerometer".to_string(),
            qos: 1,
            keep_alive: 5,
        }
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            source: "simulated".to_string(),
            rate_hz: 50.0,
            amplitude: 6.0,
            noise: 1.5,
            replay_path: "data/replay.jsonl".to_string(),
        }
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            low_send_secs: 5,
            high_send_secs: 10,
            max_queue_len: 100,
        }
    }
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self {
            min_degrees: 0.0,
            max_degrees: 100.0,
            center_degree: 50.0,
            total_nicks: 80,
            colors: GaugeColors::default(),
        }
    }
}

impl Default for GaugeColors {
    fn default() -> Self {
        Self {
            face_instantaneous: [38, 116, 186],  // 蓝色
            face_cumulative: [196, 110, 36],     // 橙色
            needle: [198, 40, 40],               // 红色
            ticks: [228, 228, 228],              // 浅灰
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_path: "data/gauge_state.toml".to_string(),
            auto_create_dir: true,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 5000,
            display_channel_capacity: 1024,
            command_channel_capacity: 16,
        }
    }
}

impl AppConfig {
    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e))?;

        let config: AppConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e))?;

        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::IoError(e))?;

        Ok(())
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width <= 0.0 || self.window.height <= 0.0 {
            return Err(ConfigError::ValidationError("Window dimensions must be positive".to_string()));
        }

        if self.sampler.rate_hz <= 0.0 {
            return Err(ConfigError::ValidationError("Sample rate must be positive".to_string()));
        }

        // 随机发送窗口取 [low, high),要求区间非空
        if self.publisher.low_send_secs >= self.publisher.high_send_secs {
            return Err(ConfigError::ValidationError("low_send_secs must be less than high_send_secs".to_string()));
        }

        if self.publisher.max_queue_len == 0 {
            return Err(ConfigError::ValidationError("Max queue length must be positive".to_string()));
        }

        if self.gauge.min_degrees >= self.gauge.max_degrees {
            return Err(ConfigError::ValidationError("Gauge range must be ascending".to_string()));
        }

        if self.gauge.center_degree < self.gauge.min_degrees
            || self.gauge.center_degree > self.gauge.max_degrees
        {
            return Err(ConfigError::ValidationError("Gauge center must lie within its range".to_string()));
        }

        if self.gauge.total_nicks == 0 {
            return Err(ConfigError::ValidationError("Gauge needs at least one nick".to_string()));
        }

        if self.channels.event_channel_capacity == 0
            || self.channels.display_channel_capacity == 0
            || self.channels.command_channel_capacity == 0
        {
            return Err(ConfigError::ValidationError("Channel capacities must be positive".to_string()));
        }

        Ok(())
    }

    /// 获取状态文件路径
    pub fn get_state_path(&self) -> PathBuf {
        PathBuf::from(&self.storage.state_path)
    }

    /// 获取数据目录路径
    pub fn get_data_directory(&self) -> PathBuf {
        self.get_state_path().parent().unwrap_or(std::path::Path::new(".")).to_path_buf()
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),
    #[error("Parse error: {0}")]
    ParseError(toml::de::Error),
    #[error("Serialize error: {0}")]
    SerializeError(toml::ser::Error),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// 配置管理器
pub struct ConfigManager {
    config: AppConfig,
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
            config_path: None,
        }
    }

    /// 从文件加载配置
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let config = AppConfig::load_from_file(&path)?;
        Ok(Self {
            config,
            config_path: Some(path.as_ref().to_path_buf()),
        })
    }

    /// 获取当前配置
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// 获取可变配置
    pub fn get_config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// 保存配置
    pub fn save(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.config_path {
            self.config.save_to_file(path)?;
        }
        Ok(())
    }

    /// 保存配置到指定文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), ConfigError> {
        self.config.save_to_file(path)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_send_window_rejected() {
        let mut config = AppConfig::default();
        config.publisher.low_send_secs = 10;
        config.publisher.high_send_secs = 10;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_gauge_range_rejected() {
        let mut config = AppConfig::default();
        config.gauge.min_degrees = 100.0;
        config.gauge.max_degrees = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let mut config = AppConfig::default();
        config.sampler.rate_hz = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = AppConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.mqtt.topic, config.mqtt.topic);
        assert_eq!(parsed.publisher.max_queue_len, config.publisher.max_queue_len);
        assert_eq!(parsed.gauge.total_nicks, config.gauge.total_nicks);
    }
}
