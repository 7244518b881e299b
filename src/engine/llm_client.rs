use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API credential configured")]
    MissingCredential,
    #[error("request to generation API failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("generation API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("could not decode generation API response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("generation API returned no completion text")]
    EmptyCompletion,
}

/// One outbound completion request.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub api_key: &'a str,
    pub model: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
}

/// Anything that turns a prompt into raw completion text.
pub trait TextGenerator {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError>;
}

#[derive(Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
}

#[derive(Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Deserialize)]
pub struct Choice {
    pub message: ChatMessageResponse,
}

#[derive(Deserialize)]
pub struct ChatMessageResponse {
    pub content: Option<String>,
}

/// OpenAI-style chat-completions client.
pub struct ChatClient {
    http: Client,
    endpoint: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

impl TextGenerator for ChatClient {
    fn generate(&self, request: &GenerationRequest<'_>) -> Result<String, GenerationError> {
        if request.api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let body = ChatCompletionRequest {
            model: request.model,
            temperature: request.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: request.prompt,
            }],
        };

        tracing::debug!(endpoint = %self.endpoint, model = request.model, "sending completion request");

        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(request.api_key)
            .json(&body)
            .send()?;

        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        extract_completion(&text)
    }
}

/// Pull the first choice's message text out of a chat-completions body.
fn extract_completion(body: &str) -> Result<String, GenerationError> {
    let parsed: ChatCompletionResponse = serde_json::from_str(body)?;

    parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationError::EmptyCompletion)
}
