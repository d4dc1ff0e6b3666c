/// One element of the publish payload, serialized as {"time": .., "value": ..}
#[derive(serde::Serialize, Clone, Copy, Debug, PartialEq)]
pub struct BatchEntry {
    pub time: i64,
    pub value: f64,
}

impl BatchEntry {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}
