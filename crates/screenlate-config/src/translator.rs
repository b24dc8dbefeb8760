use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_model_path() -> PathBuf {
    PathBuf::from("./models/mistral-7b-instruct-v0.2.Q6_K.gguf")
}

fn default_server_binary() -> String {
    "llama-server".to_string()
}

fn default_port() -> u16 {
    8719
}

fn default_gpu_layers() -> u32 {
    35
}

fn default_main_gpu() -> u32 {
    1
}

fn default_context_size() -> u32 {
    2048
}

fn default_prompt_template() -> String {
    "[INST] Translate the following text to Russian. Reply with the translation only.\n\n{text} [/INST]"
        .to_string()
}

fn default_max_tokens() -> u32 {
    256
}

fn default_temperature() -> f32 {
    0.2
}

fn default_top_p() -> f32 {
    0.9
}

fn default_stop() -> Vec<String> {
    vec!["</s>".to_string(), "[INST]".to_string()]
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    /// GGUF weights served by the local llama.cpp server
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// llama.cpp server executable spawned on startup
    #[serde(default = "default_server_binary")]
    pub server_binary: String,
    /// Already running server; nothing is spawned when set
    pub endpoint: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_gpu_layers")]
    pub gpu_layers: u32,
    #[serde(default = "default_main_gpu")]
    pub main_gpu: u32,
    #[serde(default = "default_context_size")]
    pub context_size: u32,
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_stop")]
    pub stop: Vec<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            server_binary: default_server_binary(),
            endpoint: None,
            port: default_port(),
            gpu_layers: default_gpu_layers(),
            main_gpu: default_main_gpu(),
            context_size: default_context_size(),
            prompt_template: default_prompt_template(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            stop: default_stop(),
        }
    }
}
