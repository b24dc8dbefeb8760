use screenlate_types::Action;
use serde::{Deserialize, Serialize};

fn default_select_ocr_region() -> String {
    "ctrl+alt+1".to_string()
}

fn default_select_output_region() -> String {
    "ctrl+alt+2".to_string()
}

fn default_toggle_translation() -> String {
    "ctrl+alt+3".to_string()
}

fn default_one_shot_ocr() -> String {
    "ctrl+alt+4".to_string()
}

fn default_one_shot_translate() -> String {
    "ctrl+alt+5".to_string()
}

/// Key combinations in `modifier+...+key` form
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct HotkeyConfig {
    #[serde(default = "default_select_ocr_region")]
    pub select_ocr_region: String,
    #[serde(default = "default_select_output_region")]
    pub select_output_region: String,
    #[serde(default = "default_toggle_translation")]
    pub toggle_translation: String,
    #[serde(default = "default_one_shot_ocr")]
    pub one_shot_ocr: String,
    #[serde(default = "default_one_shot_translate")]
    pub one_shot_translate: String,
}

impl HotkeyConfig {
    pub fn binding(&self, action: Action) -> &str {
        match action {
            Action::SelectOcrRegion => &self.select_ocr_region,
            Action::SelectOutputRegion => &self.select_output_region,
            Action::ToggleAutoTranslation => &self.toggle_translation,
            Action::OneShotOcr => &self.one_shot_ocr,
            Action::OneShotTranslate => &self.one_shot_translate,
        }
    }

    pub fn bindings(&self) -> Vec<(Action, &str)> {
        Action::ALL
            .iter()
            .map(|action| (*action, self.binding(*action)))
            .collect()
    }
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            select_ocr_region: default_select_ocr_region(),
            select_output_region: default_select_output_region(),
            toggle_translation: default_toggle_translation(),
            one_shot_ocr: default_one_shot_ocr(),
            one_shot_translate: default_one_shot_translate(),
        }
    }
}
