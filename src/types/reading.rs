/// One processed sample: instantaneous magnitude plus the running cumulative
/// metric at that point in the stream. Immutable once created.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    pub timestamp: i64,
    pub instantaneous: f64,
    pub cumulative: f64,
}

impl Reading {
    pub fn new(timestamp: i64, instantaneous: f64, cumulative: f64) -> Self {
        Self {
            timestamp,
            instantaneous,
            cumulative,
        }
    }
}
