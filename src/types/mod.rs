pub mod sample;
pub mod reading;
pub mod batch;
pub mod commands;

pub use sample::{RawSample, SensorEvent};
pub use reading::Reading;
pub use batch::BatchEntry;
pub use commands::SessionCommand;
