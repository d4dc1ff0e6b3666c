pub mod batcher;

pub use batcher::BatchPublisher;

use crate::types::BatchEntry;

/// 批量发布的下游出口。fire-and-forget:实现方自行记录失败,
/// 调用方不重试也不检查结果。
pub trait Publisher: Send {
    fn publish(&self, batch: &[BatchEntry]);
}

/// 时间刷新阈值来源,抽象出随机数以便测试注入固定序列
pub trait ThresholdSource: Send {
    /// 抽取 [low, high) 内的整数秒阈值
    fn draw(&mut self, low: u32, high: u32) -> u32;
}

/// 生产实现:每次评估都重新抽取
pub struct UniformThreshold;

impl ThresholdSource for UniformThreshold {
    fn draw(&mut self, low: u32, high: u32) -> u32 {
        crate::utils::random_between(low, high)
    }
}
