pub mod animator;
pub mod view;

pub use animator::{FrameScheduler, NeedleAnimator};
pub use view::render_gauge;
