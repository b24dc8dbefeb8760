use serde::{Deserialize, Serialize};

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_size() -> u32 {
    18
}

fn default_wrap_width() -> u32 {
    800
}

fn default_poll_interval_ms() -> u64 {
    50
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct OverlayConfig {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Maximum text width in pixels before wrapping
    #[serde(default = "default_wrap_width")]
    pub wrap_width: u32,
    /// How often the GUI thread drains queued overlay commands
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            wrap_width: default_wrap_width(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
