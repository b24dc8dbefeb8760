mod engine;
mod llama_server;
mod llm;

pub use engine::{Completion, CompletionRequest, ModelEngine};
pub use llama_server::{LlamaServer, LlamaServerOptions};
pub use llm::{GenerationParams, LlmTranslator, PromptTemplate, clean_output};

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate recognized text. Empty input yields empty output.
    async fn translate(&self, text: &str) -> Result<String, TranslateError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub model: String,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Model error: {0}")]
    Engine(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Prompt template needs exactly one {{text}} placeholder, found {0}")]
    InvalidTemplate(usize),

    #[error("Model server failed to start: {0}")]
    Startup(String),
}
