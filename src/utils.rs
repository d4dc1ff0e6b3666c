use chrono::{Local, TimeZone, Utc};
use rand::Rng;

/// 将毫秒时间戳格式化为本地时间 HH:MM:SS.mmm
pub fn format_timestamp(timestamp_ms: i64) -> String {
    match Utc.timestamp_millis_opt(timestamp_ms).single() {
        Some(utc) => utc.with_timezone(&Local).format("%H:%M:%S%.3f").to_string(),
        None => format!("Invalid timestamp: {}", timestamp_ms),
    }
}

/// 三轴加速度的欧氏模长
pub fn total_acceleration(x: f64, y: f64, z: f64) -> f64 {
    (x * x + y * y + z * z).sqrt()
}

/// 四舍五入到指定小数位,.5 一律远离零 (显示用)
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// 返回 [low, high) 区间内的随机整数,要求 low < high
pub fn random_between(low: u32, high: u32) -> u32 {
    rand::rng().random_range(low..high)
}

/// 会话标识,用于日志关联一次采样生命周期
pub fn generate_session_id() -> String {
    format!("session_{}", Utc::now().format("%Y%m%d_%H%M%S"))
}
