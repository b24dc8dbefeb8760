mod rect;
pub mod types;

pub use rect::{CaptureRegion, Rect};
pub use types::{Action, Frame};
