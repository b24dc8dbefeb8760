use std::path::Path;
use std::time::Duration;

use screenlate_config::translator::TranslatorConfig;
use screenlate_config::{Config, ConfigError};
use screenlate_core::PipelineSettings;
use screenlate_translator::{GenerationParams, LlamaServerOptions};

/// Looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

const MODEL_LOAD_TIMEOUT: Duration = Duration::from_secs(180);

/// Load the config file (explicit path, `./config.json`, or built-in
/// defaults), apply environment overrides, and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            tracing::info!("Loading config from {}", path.display());
            Config::from_file(path)?
        }
        None if Path::new(DEFAULT_CONFIG_PATH).is_file() => {
            tracing::info!("Loading config from {DEFAULT_CONFIG_PATH}");
            Config::from_file(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => {
            tracing::info!("No config file found, using defaults");
            Config::default()
        }
    };

    config.apply_env();
    config.validate()?;
    Ok(config)
}

pub fn pipeline_settings(config: &Config) -> PipelineSettings {
    PipelineSettings {
        capture_interval: Duration::from_millis(config.capture.interval_ms),
        output_margin: config.capture.output_margin,
        workers: config.capture.workers,
    }
}

pub fn server_options(config: &TranslatorConfig) -> LlamaServerOptions {
    LlamaServerOptions {
        binary: config.server_binary.clone(),
        model_path: config.model_path.clone(),
        port: config.port,
        gpu_layers: config.gpu_layers,
        main_gpu: config.main_gpu,
        context_size: config.context_size,
        startup_timeout: MODEL_LOAD_TIMEOUT,
    }
}

pub fn generation_params(config: &TranslatorConfig) -> GenerationParams {
    GenerationParams {
        max_tokens: config.max_tokens,
        temperature: config.temperature,
        top_p: config.top_p,
        stop: config.stop.clone(),
    }
}
