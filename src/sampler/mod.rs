pub mod session;
pub mod source;

pub use session::{run_session, run_source, GaugeSession};
pub use source::{build_source, SampleSource, SamplerError};
