use screenlate_types::Rect;

/// Screen grab failures. A failed capture skips one cycle.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("region {0} is not on any display")]
    OffScreen(Rect),

    #[error("screen capture failed: {0}")]
    Backend(String),
}

/// OCR engine failures. The cycle goes on as if nothing was recognized.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("text recognition failed: {0}")]
    Engine(String),
}
