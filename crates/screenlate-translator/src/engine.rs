use crate::TranslateError;

/// One generation call against the language model
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens: u32,
    pub stop: Vec<String>,
    pub temperature: f32,
    pub top_p: f32,
}

/// Generated text plus whatever metadata the engine reports
#[derive(Debug, Clone, Default)]
pub struct Completion {
    pub text: String,
    pub tokens_predicted: u32,
    pub stopped_by: Option<String>,
    pub latency_ms: u64,
}

/// Language-model inference boundary. Calls may take seconds.
#[async_trait::async_trait]
pub trait ModelEngine: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, TranslateError>;

    fn model_name(&self) -> String;
}
