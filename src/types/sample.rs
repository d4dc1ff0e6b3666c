/// Raw sensor delivery: an axis-value array plus a monotonic millisecond timestamp
#[derive(Clone, Debug)]
pub struct SensorEvent {
    pub values: Vec<f64>,
    pub timestamp: i64,
}

impl SensorEvent {
    pub fn new(values: Vec<f64>, timestamp: i64) -> Self {
        Self { values, timestamp }
    }

    /// 校验轴数并抽取前三轴;不足三轴的事件无效 (多余轴忽略)
    pub fn axes(&self) -> Option<RawSample> {
        if self.values.len() < 3 {
            return None;
        }
        Some(RawSample::new(
            self.values[0],
            self.values[1],
            self.values[2],
            self.timestamp,
        ))
    }
}

/// Validated acceleration triple consumed exactly once by the signal processor
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub timestamp: i64,
}

impl RawSample {
    pub fn new(x: f64, y: f64, z: f64, timestamp: i64) -> Self {
        Self { x, y, z, timestamp }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axes_requires_three_values() {
        let event = SensorEvent::new(vec![1.0, 2.0], 100);
        assert!(event.axes().is_none());

        let event = SensorEvent::new(vec![], 100);
        assert!(event.axes().is_none());
    }

    #[test]
    fn test_axes_ignores_extra_values() {
        let event = SensorEvent::new(vec![1.0, 2.0, 3.0, 99.0], 100);
        let sample = event.axes().unwrap();
        assert_eq!(sample.x, 1.0);
        assert_eq!(sample.y, 2.0);
        assert_eq!(sample.z, 3.0);
        assert_eq!(sample.timestamp, 100);
    }
}
