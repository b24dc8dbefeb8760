use std::fs;
use std::path::Path;

use screenlate_translator::PromptTemplate;
use serde::{Deserialize, Serialize};

use self::capture::CaptureConfig;
use self::hotkeys::HotkeyConfig;
use self::overlay::OverlayConfig;
use self::translator::TranslatorConfig;

pub mod capture;
pub mod error;
pub mod hotkeys;
pub mod overlay;
pub mod translator;

pub use error::ConfigError;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub translator: TranslatorConfig,
    pub overlay: OverlayConfig,
    pub hotkeys: HotkeyConfig,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("SCREENLATE_MODEL_PATH") {
            self.translator.model_path = path.into();
        }

        if let Some(url) = lookup("SCREENLATE_LLAMA_URL") {
            self.translator.endpoint = Some(url);
        }

        if let Some(binary) = lookup("SCREENLATE_LLAMA_SERVER") {
            self.translator.server_binary = binary;
        }

        if let Some(interval) = lookup("SCREENLATE_CAPTURE_INTERVAL_MS") {
            match interval.parse() {
                Ok(ms) => self.capture.interval_ms = ms,
                Err(_) => tracing::warn!(
                    "Ignoring SCREENLATE_CAPTURE_INTERVAL_MS={interval}: not a number"
                ),
            }
        }
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capture.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capture.interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.capture.workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "capture.workers",
                reason: "at least one worker is required".to_string(),
            });
        }

        let scale = self.capture.preprocess.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "capture.preprocess.scale",
                reason: format!("{scale} is not a positive factor"),
            });
        }

        if let Some(region) = self.capture.initial_region {
            if region.width == 0 || region.height == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "capture.initial_region",
                    reason: "region has no area".to_string(),
                });
            }
            let fits = region.x.checked_add_unsigned(region.width).is_some()
                && region.y.checked_add_unsigned(region.height).is_some();
            if !fits {
                return Err(ConfigError::InvalidValue {
                    field: "capture.initial_region",
                    reason: "region extends past the coordinate range".to_string(),
                });
            }
        }

        if self.overlay.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "overlay.poll_interval_ms",
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.translator.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "translator.max_tokens",
                reason: "must be greater than zero".to_string(),
            });
        }

        PromptTemplate::new(self.translator.prompt_template.as_str())
            .map_err(ConfigError::InvalidTemplate)?;

        if self.translator.endpoint.is_none() && !self.translator.model_path.is_file() {
            return Err(ConfigError::MissingModel(
                self.translator.model_path.clone(),
            ));
        }

        for (action, combo) in self.hotkeys.bindings() {
            if combo.trim().is_empty() {
                return Err(ConfigError::InvalidHotkey {
                    action,
                    combo: combo.to_string(),
                    reason: "empty binding".to_string(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use screenlate_translator::TranslateError;
    use screenlate_types::CaptureRegion;

    use super::*;

    fn runnable() -> Config {
        let mut config = Config::default();
        config.translator.endpoint = Some("http://127.0.0.1:8080".to_string());
        config
    }

    #[test]
    fn test_defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.capture.interval_ms, 1500);
        assert_eq!(config.capture.workers, 2);
        assert_eq!(config.translator.gpu_layers, 35);
        assert_eq!(config.translator.main_gpu, 1);
        assert_eq!(config.overlay.font_family, "Arial");
        assert_eq!(config.overlay.font_size, 18);
        assert_eq!(config.overlay.wrap_width, 800);
        assert_eq!(config.hotkeys.select_ocr_region, "ctrl+alt+1");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "capture": { "interval_ms": 500 }, "overlay": {} }"#)
                .unwrap();
        assert_eq!(config.capture.interval_ms, 500);
        assert_eq!(config.capture.language, "en");
        assert_eq!(config.overlay.poll_interval_ms, 50);
        assert_eq!(config.translator.max_tokens, 256);
    }

    #[test]
    fn test_initial_region_parses() {
        let config: Config = serde_json::from_str(
            r#"{ "capture": { "initial_region": { "x": 100, "y": 100, "width": 200, "height": 50 } } }"#,
        )
        .unwrap();
        let region = config.capture.initial_region.unwrap();
        assert_eq!((region.x, region.width), (100, 200));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("SCREENLATE_MODEL_PATH", "/models/other.gguf"),
            ("SCREENLATE_CAPTURE_INTERVAL_MS", "250"),
            ("SCREENLATE_LLAMA_URL", "http://127.0.0.1:9000"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_from(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.capture.interval_ms, 250);
        assert_eq!(
            config.translator.model_path,
            std::path::PathBuf::from("/models/other.gguf")
        );
        assert_eq!(
            config.translator.endpoint.as_deref(),
            Some("http://127.0.0.1:9000")
        );
    }

    #[test]
    fn test_bad_interval_env_is_ignored() {
        let mut config = Config::default();
        config.apply_env_from(|key| {
            (key == "SCREENLATE_CAPTURE_INTERVAL_MS").then(|| "soon".to_string())
        });
        assert_eq!(config.capture.interval_ms, 1500);
    }

    #[test]
    fn test_validate_accepts_runnable_config() {
        assert!(runnable().validate().is_ok());
    }

    #[test]
    fn test_validate_missing_model() {
        let mut config = Config::default();
        config.translator.model_path = "/definitely/not/here.gguf".into();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::MissingModel(_))
        ));
    }

    #[test]
    fn test_validate_template_placeholder_count() {
        let mut config = runnable();
        config.translator.prompt_template = "Translate: nothing".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTemplate(TranslateError::InvalidTemplate(0)))
        ));

        config.translator.prompt_template = "{text} and {text}".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTemplate(TranslateError::InvalidTemplate(2)))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_interval_and_workers() {
        let mut config = runnable();
        config.capture.interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "capture.interval_ms",
                ..
            })
        ));

        let mut config = runnable();
        config.capture.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_initial_region() {
        let mut config = runnable();
        config.capture.initial_region = Some(CaptureRegion {
            x: 100,
            y: 100,
            width: 200,
            height: 50,
        });
        assert!(config.validate().is_ok());

        config.capture.initial_region = Some(CaptureRegion {
            x: 100,
            y: 100,
            width: 0,
            height: 50,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "capture.initial_region",
                ..
            })
        ));

        config.capture.initial_region = Some(CaptureRegion {
            x: 0,
            y: i32::MIN,
            width: 10,
            height: u32::MAX,
        });
        assert!(config.validate().is_ok());

        config.capture.initial_region = Some(CaptureRegion {
            x: 0,
            y: 0,
            width: 10,
            height: u32::MAX,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "capture.initial_region",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_hotkey() {
        let mut config = runnable();
        config.hotkeys.one_shot_ocr = "  ".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHotkey { .. })
        ));
    }

    #[test]
    fn test_from_file_reports_parse_errors() {
        let path = std::env::temp_dir().join(format!(
            "screenlate-config-test-{}.json",
            std::process::id()
        ));
        fs::write(&path, "{ not json").unwrap();
        let result = Config::from_file(&path);
        fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
