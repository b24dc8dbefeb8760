use std::path::PathBuf;

use screenlate_translator::TranslateError;
use screenlate_types::Action;

/// Startup-time configuration failures. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("model file not found: {0}")]
    MissingModel(PathBuf),

    #[error("invalid translator.prompt_template: {0}")]
    InvalidTemplate(#[source] TranslateError),

    #[error("invalid hotkey for {action}: '{combo}' ({reason})")]
    InvalidHotkey {
        action: Action,
        combo: String,
        reason: String,
    },

    #[error("hotkey '{combo}' is bound to both {first} and {second}")]
    DuplicateHotkey {
        combo: String,
        first: Action,
        second: Action,
    },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
