pub mod client;

pub use client::{run_event_loop, MqttPublisher};
