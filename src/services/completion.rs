use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    constants::{
        DEFAULT_HUGGINGFACE_MODEL, DEFAULT_OPENAI_MODEL, HUGGINGFACE_API_URL, OPENAI_API_URL,
    },
    error::{AppError, Result},
};

pub const AI_UNAVAILABLE: &str = "🤖 מצטער, שירות AI לא זמין כרגע.";
pub const AI_ERROR: &str = "🤖 מצטער, אירעה שגיאה ב-AI. נסה שוב מאוחר יותר.";
pub const AI_EMPTY_ANSWER: &str = "לא התקבלה תשובה";

/// Stateless text completion. Every call is independent.
#[async_trait]
pub trait Completion: Send + Sync {
    fn is_configured(&self) -> bool;

    /// Generated text, or one of the canned messages when the service is not
    /// configured or the call fails.
    async fn complete(&self, prompt: &str, context: &str) -> String;
}

/// Builds the provider selected by `COMPLETION_PROVIDER`.
pub fn completion_from_config(config: &Config) -> Box<dyn Completion> {
    match config.completion_provider.as_str() {
        "huggingface" => Box::new(HuggingFaceCompletion::new(
            config
                .completion_api_url
                .clone()
                .unwrap_or_else(|| HUGGINGFACE_API_URL.to_string()),
            config.huggingface_token.clone(),
            config
                .completion_model
                .clone()
                .unwrap_or_else(|| DEFAULT_HUGGINGFACE_MODEL.to_string()),
        )),
        _ => Box::new(OpenAiCompletion::new(
            config
                .completion_api_url
                .clone()
                .unwrap_or_else(|| OPENAI_API_URL.to_string()),
            config.openai_api_key.clone(),
            config
                .completion_model
                .clone()
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            config.completion_max_tokens,
        )),
    }
}

fn system_prompt(context: &str) -> String {
    format!("אתה עוזר AI לפלטפורמת SLH. דבר בעברית. {}", context)
        .trim()
        .to_string()
}

// ==================== OPENAI ====================

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Clone, Debug)]
pub struct OpenAiCompletion {
    base_url: String,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
    client: Client,
}

impl OpenAiCompletion {
    pub fn new(base_url: String, api_key: Option<String>, model: String, max_tokens: u32) -> Self {
        Self {
            base_url,
            api_key,
            model,
            max_tokens,
            client: Client::new(),
        }
    }

    async fn request(&self, api_key: &str, prompt: &str, context: &str) -> Result<String> {
        let system = system_prompt(context);
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
        };

        let resp = self
            .client
            .post(format!(
                "{}/v1/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AppError::Internal(format!(
                "completion endpoint returned {}",
                resp.status()
            )));
        }

        let payload: ChatCompletionResponse = resp.json().await?;
        payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AppError::Internal("completion response has no choices".to_string()))
    }
}

#[async_trait]
impl Completion for OpenAiCompletion {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, context: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return AI_UNAVAILABLE.to_string();
        };
        match self.request(api_key, prompt, context).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("AI Error: {}", e);
                AI_ERROR.to_string()
            }
        }
    }
}

// ==================== HUGGINGFACE ====================

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HuggingFaceCompletion {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
}

impl HuggingFaceCompletion {
    pub fn new(base_url: String, api_key: Option<String>, model: String) -> Self {
        Self {
            base_url,
            api_key,
            model,
            client: Client::new(),
        }
    }

    async fn request(&self, api_key: &str, prompt: &str, context: &str) -> Result<String> {
        // The inference API has no system role; the context is prepended.
        let inputs = format!("{}\n\n{}", system_prompt(context), prompt);
        let resp = self
            .client
            .post(format!(
                "{}/models/{}",
                self.base_url.trim_end_matches('/'),
                self.model
            ))
            .bearer_auth(api_key)
            .json(&InferenceRequest { inputs: &inputs })
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(AppError::Internal(format!(
                "inference endpoint returned {}",
                resp.status()
            )));
        }

        let payload: Vec<GeneratedText> = resp.json().await?;
        Ok(payload
            .into_iter()
            .next()
            .and_then(|item| item.generated_text)
            .filter(|text| !text.trim().is_empty())
            .unwrap_or_else(|| AI_EMPTY_ANSWER.to_string()))
    }
}

#[async_trait]
impl Completion for HuggingFaceCompletion {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, prompt: &str, context: &str) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return AI_UNAVAILABLE.to_string();
        };
        match self.request(api_key, prompt, context).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("AI Error: {}", e);
                AI_ERROR.to_string()
            }
        }
    }
}
