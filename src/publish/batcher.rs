use super::{Publisher, ThresholdSource};
use crate::config::PublisherConfig;
use crate::types::{BatchEntry, Reading};
use log::{debug, info};

/// 批量发布器:按到达顺序缓冲读数,凑满一批或超过随机时间窗后整体交给
/// 下游发布。去重只比较相邻两次 offer 的瞬时值是否完全相等。
pub struct BatchPublisher {
    queue: Vec<BatchEntry>,
    last_value: f64,
    last_flush_ms: i64,
    low_send_secs: u32,
    high_send_secs: u32,
    max_queue_len: usize,
    thresholds: Box<dyn ThresholdSource>,
    publisher: Box<dyn Publisher>,
    batches_published: u64,
}

impl BatchPublisher {
    pub fn new(
        publisher: Box<dyn Publisher>,
        thresholds: Box<dyn ThresholdSource>,
        config: &PublisherConfig,
        now_ms: i64,
    ) -> Self {
        Self {
            queue: Vec::new(),
            last_value: 0.0,
            last_flush_ms: now_ms,
            low_send_secs: config.low_send_secs,
            high_send_secs: config.high_send_secs,
            max_queue_len: config.max_queue_len,
            thresholds,
            publisher,
            batches_published: 0,
        }
    }

    /// 提交一条读数,返回本次调用是否触发了发布。
    /// 与上一次瞬时值完全相等的读数不入队,但 last_value 与刷新判定
    /// 在每次调用都会推进。
    pub fn offer(&mut self, reading: &Reading, now_ms: i64) -> bool {
        if reading.instantaneous != self.last_value {
            self.queue
                .push(BatchEntry::new(reading.timestamp, reading.instantaneous));
        }
        self.last_value = reading.instantaneous;

        let elapsed_secs = (now_ms - self.last_flush_ms) / 1000;
        // 时间阈值每次判定都重新抽取
        let due = self.queue.len() >= self.max_queue_len
            || (!self.queue.is_empty()
                && elapsed_secs >= self.thresholds.draw(self.low_send_secs, self.high_send_secs) as i64);

        if due {
            self.flush(now_ms);
        }
        due
    }

    /// 会话结束:无条件发布当前队列内容 (即使为空) 并清空
    pub fn finish(&mut self, now_ms: i64) {
        info!(
            "Session end, publishing final batch of {} entries",
            self.queue.len()
        );
        self.flush(now_ms);
    }

    fn flush(&mut self, now_ms: i64) {
        let batch = std::mem::take(&mut self.queue);
        self.publisher.publish(&batch);
        self.batches_published += 1;
        self.last_flush_ms = now_ms;
        debug!("Flushed batch of {} entries", batch.len());
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn batches_published(&self) -> u64 {
        self.batches_published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct RecordingPublisher {
        batches: Arc<Mutex<Vec<Vec<BatchEntry>>>>,
    }

    impl Publisher for RecordingPublisher {
        fn publish(&self, batch: &[BatchEntry]) {
            self.batches.lock().unwrap().push(batch.to_vec());
        }
    }

    struct FixedThreshold(u32);

    impl ThresholdSource for FixedThreshold {
        fn draw(&mut self, _low: u32, _high: u32) -> u32 {
            self.0
        }
    }

    struct ScriptedThreshold {
        draws: Vec<u32>,
        next: usize,
    }

    impl ThresholdSource for ScriptedThreshold {
        fn draw(&mut self, _low: u32, _high: u32) -> u32 {
            let value = self.draws[self.next % self.draws.len()];
            self.next += 1;
            value
        }
    }

    const BASE_MS: i64 = 1_000_000;

    fn batcher_with(
        thresholds: Box<dyn ThresholdSource>,
    ) -> (BatchPublisher, Arc<Mutex<Vec<Vec<BatchEntry>>>>) {
        let batches = Arc::new(Mutex::new(Vec::new()));
        let publisher = RecordingPublisher {
            batches: batches.clone(),
        };
        let batcher = BatchPublisher::new(
            Box::new(publisher),
            thresholds,
            &PublisherConfig::default(),
            BASE_MS,
        );
        (batcher, batches)
    }

    fn reading(timestamp: i64, instantaneous: f64) -> Reading {
        Reading::new(timestamp, instantaneous, 0.0)
    }

    #[test]
    fn test_consecutive_duplicates_coalesce() {
        let (mut batcher, _batches) = batcher_with(Box::new(FixedThreshold(5)));
        batcher.offer(&reading(1, 5.0), BASE_MS + 100);
        batcher.offer(&reading(2, 5.0), BASE_MS + 200);
        batcher.offer(&reading(3, 5.0), BASE_MS + 300);
        assert_eq!(batcher.queue_len(), 1);
    }

    #[test]
    fn test_alternating_values_all_enqueue() {
        let (mut batcher, _batches) = batcher_with(Box::new(FixedThreshold(5)));
        batcher.offer(&reading(1, 5.0), BASE_MS + 100);
        batcher.offer(&reading(2, 7.0), BASE_MS + 200);
        batcher.offer(&reading(3, 5.0), BASE_MS + 300);
        assert_eq!(batcher.queue_len(), 3);
    }

    #[test]
    fn test_initial_zero_reading_coalesces() {
        // last_value 初始为 0.0,首条恰为 0.0 的读数会被去重
        let (mut batcher, _batches) = batcher_with(Box::new(FixedThreshold(5)));
        batcher.offer(&reading(1, 0.0), BASE_MS + 100);
        assert_eq!(batcher.queue_len(), 0);
    }

    #[test]
    fn test_size_trigger_flushes_full_batch() {
        let (mut batcher, batches) = batcher_with(Box::new(FixedThreshold(5)));
        for i in 0..99 {
            let flushed = batcher.offer(&reading(i, (i + 1) as f64), BASE_MS + 100);
            assert!(!flushed);
        }
        let flushed = batcher.offer(&reading(99, 100.0), BASE_MS + 100);
        assert!(flushed);

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 100);
        assert_eq!(batches[0][0].value, 1.0);
        assert_eq!(batches[0][99].value, 100.0);
        drop(batches);
        assert_eq!(batcher.queue_len(), 0);
    }

    #[test]
    fn test_time_trigger_boundary() {
        let (mut batcher, batches) = batcher_with(Box::new(FixedThreshold(5)));
        assert!(!batcher.offer(&reading(1, 1.0), BASE_MS + 4_999));
        assert!(batcher.offer(&reading(2, 2.0), BASE_MS + 5_000));

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 2);
        assert_eq!(batches[0][0].time, 1);
        assert_eq!(batches[0][1].time, 2);
    }

    #[test]
    fn test_empty_queue_never_time_flushes() {
        let (mut batcher, batches) = batcher_with(Box::new(FixedThreshold(5)));
        // 读数被去重,队列保持为空,再久也不触发时间刷新
        assert!(!batcher.offer(&reading(1, 0.0), BASE_MS + 60_000));
        assert!(batches.lock().unwrap().is_empty());
    }

    #[test]
    fn test_threshold_redrawn_on_every_offer() {
        let (mut batcher, _batches) = batcher_with(Box::new(ScriptedThreshold {
            draws: vec![9, 5],
            next: 0,
        }));
        // 6 秒:第一次抽到 9 不刷,第二次抽到 5 即刷
        assert!(!batcher.offer(&reading(1, 1.0), BASE_MS + 6_000));
        assert!(batcher.offer(&reading(2, 1.0), BASE_MS + 6_500));
        assert_eq!(batcher.batches_published(), 1);
    }

    #[test]
    fn test_worst_case_draw_still_flushes_before_high_bound() {
        // 抽取范围是 [5, 10),最不利也只会抽到 9
        let (mut batcher, _batches) = batcher_with(Box::new(FixedThreshold(9)));
        assert!(!batcher.offer(&reading(1, 1.0), BASE_MS + 8_999));
        assert!(batcher.offer(&reading(2, 2.0), BASE_MS + 9_000));
        assert_eq!(batcher.batches_published(), 1);
    }

    #[test]
    fn test_flush_resets_time_window() {
        let (mut batcher, batches) = batcher_with(Box::new(FixedThreshold(5)));
        assert!(batcher.offer(&reading(1, 1.0), BASE_MS + 5_000));
        // 距上次刷新只过了 1 秒,未到阈值
        assert!(!batcher.offer(&reading(2, 2.0), BASE_MS + 6_000));
        assert_eq!(batches.lock().unwrap().len(), 1);
        assert_eq!(batcher.queue_len(), 1);
    }

    #[test]
    fn test_finish_flushes_remainder() {
        let (mut batcher, batches) = batcher_with(Box::new(FixedThreshold(5)));
        batcher.offer(&reading(1, 3.0), BASE_MS + 100);
        batcher.finish(BASE_MS + 200);

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0], vec![BatchEntry::new(1, 3.0)]);
        drop(batches);
        assert_eq!(batcher.queue_len(), 0);
    }

    #[test]
    fn test_finish_publishes_even_when_empty() {
        let (mut batcher, batches) = batcher_with(Box::new(FixedThreshold(5)));
        batcher.finish(BASE_MS + 100);

        let batches = batches.lock().unwrap();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].is_empty());
    }
}
