use crate::types::{RawSample, Reading, SensorEvent};
use crate::utils;

/// 信号处理器:把原始三轴样本折叠成瞬时模长与累计指标。
/// 累计是顺序敏感的折叠,必须由单个消费者按到达顺序串行调用。
pub struct SignalProcessor {
    cumulative: f64,
    samples_processed: u64,
}

impl SignalProcessor {
    pub fn new() -> Self {
        Self {
            cumulative: 0.0,
            samples_processed: 0,
        }
    }

    /// 处理一条原始事件;轴数不足的事件静默丢弃,不推进累计
    pub fn process_event(&mut self, event: &SensorEvent) -> Option<Reading> {
        event.axes().map(|sample| self.process(&sample))
    }

    /// 处理一条校验后的样本
    pub fn process(&mut self, sample: &RawSample) -> Reading {
        let instantaneous = utils::total_acceleration(sample.x, sample.y, sample.z);
        self.cumulative += instantaneous.floor() * 0.01;
        self.samples_processed += 1;
        Reading::new(sample.timestamp, instantaneous, self.cumulative)
    }

    pub fn cumulative(&self) -> f64 {
        self.cumulative
    }

    /// 覆写累计值 (恢复持久化状态或清零),样本计数不受影响
    pub fn set_cumulative(&mut self, value: f64) {
        self.cumulative = value;
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instantaneous_magnitude_of_known_vector() {
        let mut processor = SignalProcessor::new();
        let event = SensorEvent::new(vec![1.5, 3.7, 6.2], 42);
        let reading = processor.process_event(&event).unwrap();
        assert!((reading.instantaneous - 7.3742796).abs() < 1e-5);
        assert_eq!(reading.timestamp, 42);
    }

    #[test]
    fn test_cumulative_folds_floored_hundredths() {
        let mut processor = SignalProcessor::new();
        // 模长依次为 5.0, 2.0, 0.5
        processor.process(&RawSample::new(3.0, 4.0, 0.0, 1));
        processor.process(&RawSample::new(0.0, 0.0, 2.0, 2));
        let reading = processor.process(&RawSample::new(0.3, 0.4, 0.0, 3));
        assert!((reading.cumulative - 0.07).abs() < 1e-12);
        assert!((processor.cumulative() - 0.07).abs() < 1e-12);
    }

    #[test]
    fn test_cumulative_matches_independent_fold() {
        let samples = [
            RawSample::new(1.5, 3.7, 6.2, 1),
            RawSample::new(0.1, 0.1, 0.1, 2),
            RawSample::new(9.0, 0.5, 2.25, 3),
            RawSample::new(4.4, 4.4, 4.4, 4),
        ];

        let expected: f64 = samples
            .iter()
            .map(|s| utils::total_acceleration(s.x, s.y, s.z).floor() * 0.01)
            .sum();

        let mut processor = SignalProcessor::new();
        for sample in &samples {
            processor.process(sample);
        }
        assert!((processor.cumulative() - expected).abs() < 1e-9);
        assert_eq!(processor.samples_processed(), 4);
    }

    #[test]
    fn test_seeded_cumulative_resumes() {
        let mut processor = SignalProcessor::new();
        processor.set_cumulative(10.0);
        let reading = processor.process(&RawSample::new(3.0, 4.0, 0.0, 7));
        assert!((reading.cumulative - 10.05).abs() < 1e-12);
    }

    #[test]
    fn test_short_event_dropped_without_side_effects() {
        let mut processor = SignalProcessor::new();
        processor.set_cumulative(5.0);
        let event = SensorEvent::new(vec![1.0, 2.0], 9);
        assert!(processor.process_event(&event).is_none());
        assert_eq!(processor.cumulative(), 5.0);
        assert_eq!(processor.samples_processed(), 0);
    }

    #[test]
    fn test_zero_reset_starts_cumulative_over() {
        let mut processor = SignalProcessor::new();
        processor.process(&RawSample::new(6.0, 8.0, 0.0, 1));
        processor.set_cumulative(0.0);
        let reading = processor.process(&RawSample::new(3.0, 4.0, 0.0, 2));
        assert!((reading.cumulative - 0.05).abs() < 1e-12);
    }
}
