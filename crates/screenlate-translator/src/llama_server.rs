use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::{Child, Command};

use crate::{Completion, CompletionRequest, ModelEngine, TranslateError};

const HEALTH_POLL: Duration = Duration::from_millis(500);

/// How to launch a llama.cpp server for the configured model
#[derive(Debug, Clone)]
pub struct LlamaServerOptions {
    pub binary: String,
    pub model_path: PathBuf,
    pub port: u16,
    pub gpu_layers: u32,
    pub main_gpu: u32,
    pub context_size: u32,
    pub startup_timeout: Duration,
}

/// Model engine talking to a llama.cpp server bound to loopback.
///
/// When spawned by us the server process is killed on drop.
pub struct LlamaServer {
    client: reqwest::Client,
    base_url: String,
    model: String,
    _child: Option<Child>,
}

#[derive(Serialize)]
struct CompletionBody<'a> {
    prompt: &'a str,
    n_predict: u32,
    stop: &'a [String],
    temperature: f32,
    top_p: f32,
    cache_prompt: bool,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
    #[serde(default)]
    tokens_predicted: u32,
    #[serde(default)]
    stopping_word: String,
}

impl LlamaServer {
    /// Use a server that is already running
    pub fn connect(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            model: base_url.clone(),
            base_url,
            _child: None,
        }
    }

    /// Launch the server and wait until the model is loaded
    pub async fn spawn(options: &LlamaServerOptions) -> Result<Self, TranslateError> {
        tracing::info!(
            "Loading model {} ({} GPU layers on GPU {})",
            options.model_path.display(),
            options.gpu_layers,
            options.main_gpu
        );

        let mut child = Command::new(&options.binary)
            .arg("--model")
            .arg(&options.model_path)
            .args(["--host", "127.0.0.1"])
            .args(["--port", &options.port.to_string()])
            .args(["--n-gpu-layers", &options.gpu_layers.to_string()])
            .args(["--main-gpu", &options.main_gpu.to_string()])
            .args(["--ctx-size", &options.context_size.to_string()])
            .arg("--mlock")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                TranslateError::Startup(format!("failed to launch {}: {e}", options.binary))
            })?;

        let client = reqwest::Client::new();
        let base_url = format!("http://127.0.0.1:{}", options.port);
        let started = Instant::now();

        loop {
            if let Ok(Some(status)) = child.try_wait() {
                return Err(TranslateError::Startup(format!(
                    "{} exited during startup ({status})",
                    options.binary
                )));
            }

            if is_healthy(&client, &base_url).await {
                break;
            }

            if started.elapsed() > options.startup_timeout {
                return Err(TranslateError::Startup(format!(
                    "model not ready after {:?}",
                    options.startup_timeout
                )));
            }

            tokio::time::sleep(HEALTH_POLL).await;
        }

        tracing::info!("Model server ready in {:?}", started.elapsed());

        Ok(Self {
            client,
            base_url,
            model: options
                .model_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default(),
            _child: Some(child),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

async fn is_healthy(client: &reqwest::Client, base_url: &str) -> bool {
    match client.get(format!("{base_url}/health")).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

#[async_trait]
impl ModelEngine for LlamaServer {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, TranslateError> {
        let body = CompletionBody {
            prompt: &request.prompt,
            n_predict: request.max_tokens,
            stop: &request.stop,
            temperature: request.temperature,
            top_p: request.top_p,
            cache_prompt: true,
            stream: false,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(format!("{}/completion", self.base_url))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TranslateError::Engine(format!("HTTP {status}: {message}")));
        }

        let parsed: CompletionResponse = response.json().await.map_err(|e| {
            TranslateError::InvalidResponse(format!("Failed to parse completion: {e}"))
        })?;

        Ok(Completion {
            text: parsed.content,
            tokens_predicted: parsed.tokens_predicted,
            stopped_by: (!parsed.stopping_word.is_empty()).then_some(parsed.stopping_word),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}
