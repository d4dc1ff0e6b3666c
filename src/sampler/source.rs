use std::fs::File;
use std::io::{BufRead, BufReader};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use log::warn;
use rand::Rng;

use crate::config::SamplerConfig;
use crate::types::SensorEvent;

/// 采样源:内部控制节奏的惰性事件序列,耗尽后不可重启
pub trait SampleSource: Send {
    /// 阻塞到下一个事件就绪;返回 None 表示序列耗尽
    fn next_event(&mut self) -> Option<SensorEvent>;

    /// 供启动日志与状态栏展示
    fn describe(&self) -> String;
}

/// 采样源错误
#[derive(Debug, thiserror::Error)]
pub enum SamplerError {
    #[error("replay file unavailable: {0}")]
    ReplayUnavailable(String),
    #[error("unknown sample source '{0}'")]
    UnknownSource(String),
}

/// 按配置构建采样源;失败属于启动错误,采样不会开始
pub fn build_source(config: &SamplerConfig) -> Result<Box<dyn SampleSource>, SamplerError> {
    match config.source.as_str() {
        "simulated" => Ok(Box::new(SimulatedMotionSource::new(config))),
        "replay" => Ok(Box::new(ReplaySource::open(config)?)),
        other => Err(SamplerError::UnknownSource(other.to_string())),
    }
}

/// 模拟手持设备的加速度流:每轴慢速正弦摆动叠加均匀抖动,
/// z 轴带重力分量,静止模长落在 9.8 附近
pub struct SimulatedMotionSource {
    interval: Duration,
    rate_hz: f64,
    amplitude: f64,
    noise: f64,
    phase: f64,
}

impl SimulatedMotionSource {
    pub fn new(config: &SamplerConfig) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / config.rate_hz),
            rate_hz: config.rate_hz,
            amplitude: config.amplitude,
            noise: config.noise,
            phase: 0.0,
        }
    }

    fn jitter(&self) -> f64 {
        if self.noise <= 0.0 {
            return 0.0;
        }
        rand::rng().random_range(-self.noise..self.noise)
    }
}

impl SampleSource for SimulatedMotionSource {
    fn next_event(&mut self) -> Option<SensorEvent> {
        thread::sleep(self.interval);
        self.phase += self.interval.as_secs_f64();

        let x = (self.phase * 0.9).sin() * self.amplitude + self.jitter();
        let y = (self.phase * 0.6).cos() * self.amplitude * 0.7 + self.jitter();
        let z = 9.81 + (self.phase * 1.3).sin() * self.amplitude * 0.3 + self.jitter();

        Some(SensorEvent::new(
            vec![x, y, z],
            Utc::now().timestamp_millis(),
        ))
    }

    fn describe(&self) -> String {
        format!("simulated motion @ {:.0} Hz", self.rate_hz)
    }
}

/// 回放 JSONL 采样文件,保持记录顺序,按配置速率送出
pub struct ReplaySource {
    reader: BufReader<File>,
    interval: Duration,
    path: String,
    line_no: usize,
}

#[derive(serde::Deserialize)]
struct ReplayRecord {
    x: f64,
    y: f64,
    z: f64,
    timestamp: i64,
}

impl ReplaySource {
    pub fn open(config: &SamplerConfig) -> Result<Self, SamplerError> {
        let file = File::open(&config.replay_path).map_err(|e| {
            SamplerError::ReplayUnavailable(format!("{}: {}", config.replay_path, e))
        })?;

        Ok(Self {
            reader: BufReader::new(file),
            interval: Duration::from_secs_f64(1.0 / config.rate_hz),
            path: config.replay_path.clone(),
            line_no: 0,
        })
    }
}

impl SampleSource for ReplaySource {
    fn next_event(&mut self) -> Option<SensorEvent> {
        loop {
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<ReplayRecord>(trimmed) {
                        Ok(record) => {
                            thread::sleep(self.interval);
                            return Some(SensorEvent::new(
                                vec![record.x, record.y, record.z],
                                record.timestamp,
                            ));
                        }
                        Err(e) => {
                            warn!("Skipping bad replay line {}: {}", self.line_no, e);
                        }
                    }
                }
                Err(e) => {
                    warn!("Replay read failed at line {}: {}", self.line_no, e);
                    return None;
                }
            }
        }
    }

    fn describe(&self) -> String {
        format!("replay of {}", self.path)
    }
}
