use screenlate_types::CaptureRegion;
use serde::{Deserialize, Serialize};

fn default_interval_ms() -> u64 {
    1500
}

fn default_language() -> String {
    "en".to_string()
}

fn default_workers() -> usize {
    2
}

fn default_grayscale() -> bool {
    true
}

fn default_scale() -> f32 {
    1.0
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CaptureConfig {
    /// Milliseconds between automatic capture cycles
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// OCR language hint (BCP-47 tag, e.g. "en", "ja")
    #[serde(default = "default_language")]
    pub language: String,
    /// Gap in pixels between the OCR region and a derived output region
    #[serde(default)]
    pub output_margin: i32,
    /// Size of the capture/translate worker pool
    #[serde(default = "default_workers")]
    pub workers: usize,
    /// OCR region restored at startup
    pub initial_region: Option<CaptureRegion>,
    pub preprocess: PreprocessConfig,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            language: default_language(),
            output_margin: 0,
            workers: default_workers(),
            initial_region: None,
            preprocess: PreprocessConfig::default(),
        }
    }
}

/// Image normalization applied before recognition
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PreprocessConfig {
    #[serde(default = "default_grayscale")]
    pub grayscale: bool,
    /// Fixed binarization threshold; Otsu's method when absent
    pub threshold: Option<u8>,
    /// Invert after thresholding (light text on dark backgrounds)
    pub invert: bool,
    /// Upscale factor applied before thresholding
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            grayscale: default_grayscale(),
            threshold: None,
            invert: false,
            scale: default_scale(),
        }
    }
}
