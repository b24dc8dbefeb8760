use std::collections::HashMap;
use std::str::FromStr;

use anyhow::{Context, Result};
use global_hotkey::GlobalHotKeyManager;
use global_hotkey::hotkey::HotKey;
use screenlate_config::ConfigError;
use screenlate_config::hotkeys::HotkeyConfig;
use screenlate_types::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub action: Action,
    pub hotkey: HotKey,
}

pub fn parse_hotkey(action: Action, combo: &str) -> Result<HotKey, ConfigError> {
    HotKey::from_str(combo.trim()).map_err(|e| ConfigError::InvalidHotkey {
        action,
        combo: combo.to_string(),
        reason: e.to_string(),
    })
}

/// Parse every configured binding. Two actions resolving to the same key
/// combination are rejected, however the combinations were spelled.
pub fn parse_bindings(config: &HotkeyConfig) -> Result<Vec<Binding>, ConfigError> {
    let mut seen: HashMap<u32, Action> = HashMap::new();
    let mut bindings = Vec::with_capacity(Action::ALL.len());

    for (action, combo) in config.bindings() {
        let hotkey = parse_hotkey(action, combo)?;
        if let Some(first) = seen.insert(hotkey.id(), action) {
            return Err(ConfigError::DuplicateHotkey {
                combo: combo.to_string(),
                first,
                second: action,
            });
        }
        bindings.push(Binding { action, hotkey });
    }

    Ok(bindings)
}

/// Registered global hotkeys. Must live on the thread that runs the
/// platform event loop; everything is unregistered on drop.
pub struct HotkeyManager {
    manager: GlobalHotKeyManager,
    bindings: Vec<Binding>,
}

impl HotkeyManager {
    pub fn register(bindings: Vec<Binding>) -> Result<Self> {
        let manager = GlobalHotKeyManager::new().context("Failed to create hotkey manager")?;

        for binding in &bindings {
            manager
                .register(binding.hotkey)
                .with_context(|| format!("Failed to register hotkey for {}", binding.action))?;
            tracing::info!("Hotkey registered for {}: {:?}", binding.action, binding.hotkey);
        }

        Ok(Self { manager, bindings })
    }

    /// Lookup table from hotkey event id to action
    pub fn actions(&self) -> HashMap<u32, Action> {
        self.bindings
            .iter()
            .map(|binding| (binding.hotkey.id(), binding.action))
            .collect()
    }
}

impl Drop for HotkeyManager {
    fn drop(&mut self) {
        for binding in &self.bindings {
            if let Err(e) = self.manager.unregister(binding.hotkey) {
                tracing::debug!("Failed to unregister hotkey for {}: {e}", binding.action);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings_parse() {
        let bindings = parse_bindings(&HotkeyConfig::default()).unwrap();
        assert_eq!(bindings.len(), 5);
        assert_eq!(bindings[2].action, Action::ToggleAutoTranslation);
    }

    #[test]
    fn test_invalid_spec_names_action() {
        let config = HotkeyConfig {
            one_shot_ocr: "ctrl+nokey".to_string(),
            ..Default::default()
        };
        match parse_bindings(&config) {
            Err(ConfigError::InvalidHotkey { action, combo, .. }) => {
                assert_eq!(action, Action::OneShotOcr);
                assert_eq!(combo, "ctrl+nokey");
            }
            other => panic!("expected invalid hotkey, got {other:?}"),
        }
    }

    #[test]
    fn test_duplicates_detected_across_spellings() {
        let config = HotkeyConfig {
            select_ocr_region: "ctrl+alt+1".to_string(),
            one_shot_translate: "Alt+Ctrl+1".to_string(),
            ..Default::default()
        };
        match parse_bindings(&config) {
            Err(ConfigError::DuplicateHotkey { first, second, .. }) => {
                assert_eq!(first, Action::SelectOcrRegion);
                assert_eq!(second, Action::OneShotTranslate);
            }
            other => panic!("expected duplicate hotkey, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_spec_rejected() {
        let config = HotkeyConfig {
            toggle_translation: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            parse_bindings(&config),
            Err(ConfigError::InvalidHotkey { .. })
        ));
    }
}
