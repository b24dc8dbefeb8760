use std::fmt;

/// Actions a global hotkey can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SelectOcrRegion,
    SelectOutputRegion,
    ToggleAutoTranslation,
    OneShotOcr,
    OneShotTranslate,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::SelectOcrRegion,
        Action::SelectOutputRegion,
        Action::ToggleAutoTranslation,
        Action::OneShotOcr,
        Action::OneShotTranslate,
    ];

    /// Config key of the binding for this action
    pub fn config_key(&self) -> &'static str {
        match self {
            Action::SelectOcrRegion => "select_ocr_region",
            Action::SelectOutputRegion => "select_output_region",
            Action::ToggleAutoTranslation => "toggle_translation",
            Action::OneShotOcr => "one_shot_ocr",
            Action::OneShotTranslate => "one_shot_translate",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_key())
    }
}

/// Raw RGBA8 pixels grabbed from the screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }
}
