pub mod easing;
pub mod timeline;

pub use easing::{ease, ease_vec2, lerp, lerp_vec2, Easing};
pub use timeline::{MotionState, TravelTimeline};
