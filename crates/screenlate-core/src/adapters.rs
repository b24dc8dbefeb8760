use screenlate_types::{Frame, Rect};

use crate::error::{CaptureError, RecognitionError};

/// Interactive rectangle picker. Blocks the caller until the user finishes
/// or cancels; cancelling is a normal outcome and yields `None`.
pub trait RegionSelector: Send + Sync {
    fn select(&self) -> Option<Rect>;
}

/// Grabs pixels for a screen rectangle on demand
pub trait FrameSource: Send + Sync {
    fn capture(&self, region: Rect) -> Result<Frame, CaptureError>;

    /// Bounds of the display holding `region`, if known
    fn display_bounds(&self, _region: Rect) -> Option<Rect> {
        None
    }
}

/// Turns pixels into text. An empty string means nothing was recognized.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, frame: &Frame) -> Result<String, RecognitionError>;
}
