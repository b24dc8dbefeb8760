use async_trait::async_trait;

use crate::{CompletionRequest, ModelEngine, ProviderMetadata, TranslateError, Translator};

/// Placeholder substituted with the source text
const TEXT_PLACEHOLDER: &str = "{text}";

/// Chat-format markers that instruct models sometimes leak into the output
const TURN_DELIMITERS: &[&str] = &[
    "</s>",
    "<s>",
    "[INST]",
    "[/INST]",
    "<|im_start|>",
    "<|im_end|>",
    "<|eot_id|>",
    "<|end|>",
    "<end_of_turn>",
];

#[derive(Debug, Clone)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Result<Self, TranslateError> {
        let template = template.into();
        match template.matches(TEXT_PLACEHOLDER).count() {
            1 => Ok(Self(template)),
            found => Err(TranslateError::InvalidTemplate(found)),
        }
    }

    pub fn render(&self, text: &str) -> String {
        self.0.replacen(TEXT_PLACEHOLDER, text, 1)
    }
}

#[derive(Debug, Clone)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 256,
            temperature: 0.2,
            top_p: 0.9,
            stop: vec!["</s>".to_string(), "[INST]".to_string()],
        }
    }
}

/// Translator backed by a locally hosted instruct model
pub struct LlmTranslator<E> {
    engine: E,
    template: PromptTemplate,
    params: GenerationParams,
}

impl<E: ModelEngine> LlmTranslator<E> {
    pub fn new(engine: E, template: PromptTemplate, params: GenerationParams) -> Self {
        Self {
            engine,
            template,
            params,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }
}

#[async_trait]
impl<E: ModelEngine> Translator for LlmTranslator<E> {
    async fn translate(&self, text: &str) -> Result<String, TranslateError> {
        let source = text.trim();
        if source.is_empty() {
            return Ok(String::new());
        }

        let request = CompletionRequest {
            prompt: self.template.render(source),
            max_tokens: self.params.max_tokens,
            stop: self.params.stop.clone(),
            temperature: self.params.temperature,
            top_p: self.params.top_p,
        };
        tracing::debug!("LLM prompt: {:?}", request.prompt);

        let completion = self.engine.complete(request).await?;
        tracing::debug!(
            "LLM generated {} tokens in {}ms",
            completion.tokens_predicted,
            completion.latency_ms
        );

        Ok(clean_output(&completion.text, &self.params.stop))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "llama.cpp".to_string(),
            model: self.engine.model_name(),
        }
    }
}

/// Cut generated text at the first stop sequence and drop leftover turn markers
pub fn clean_output(raw: &str, stop: &[String]) -> String {
    let cut = stop
        .iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| raw.find(s.as_str()))
        .min()
        .unwrap_or(raw.len());

    let mut text = raw[..cut].to_string();
    for delimiter in TURN_DELIMITERS {
        text = text.replace(delimiter, "");
    }
    text.trim().to_string()
}
