mod capture;
#[cfg(windows)]
mod com;
mod extractor;
mod hotkey;
mod ocr;
mod preprocess;

pub use capture::{XcapFrameSource, crop_frame};
#[cfg(windows)]
pub use com::ComGuard;
pub use extractor::OcrTextExtractor;
pub use hotkey::{Binding, HotkeyManager, parse_bindings, parse_hotkey};
pub use ocr::{OcrEngine, init_ocr_engine};
pub use preprocess::{binarize, otsu_threshold, preprocess};
