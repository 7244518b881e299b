use crate::engine::controller::{ActivityProvider, SourceReply};
use crate::config::AppConfig;
use crate::engine::llm_client::{ChatClient, GenerationError, GenerationRequest, TextGenerator};
use crate::engine::prompt_builder::PromptBuilder;
use crate::engine::response_parser::{normalize_response, ParsedResponse};
use crate::model::activity::Activity;
use crate::model::static_pool::{IndexPicker, RandomPicker, SOURCE_FALLBACKS};

/// Soft error tag attached when the generation call itself failed.
pub const API_ERROR: &str = "API error";

#[derive(Debug, Clone, PartialEq)]
pub struct SourceConfig {
    /// Absent or blank means "never call the API".
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingCredential,
    ApiError,
    Unrecoverable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityOrigin {
    Generated,
    Recovered,
    Fallback(FallbackReason),
}

impl ActivityOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            ActivityOrigin::Generated => "generated",
            ActivityOrigin::Recovered => "recovered",
            ActivityOrigin::Fallback(FallbackReason::MissingCredential) => "fallback:no-credential",
            ActivityOrigin::Fallback(FallbackReason::ApiError) => "fallback:api-error",
            ActivityOrigin::Fallback(FallbackReason::Unrecoverable) => "fallback:unrecoverable",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourcedActivity {
    pub activity: Activity,
    pub origin: ActivityOrigin,
    /// Informational only; an activity is always present.
    pub error: Option<&'static str>,
}

/// The source wired to the real chat-completions endpoint.
pub type DefaultSource = ActivitySource<ChatClient, RandomPicker>;

pub fn default_source(config: &AppConfig) -> DefaultSource {
    ActivitySource::new(
        config.source_config(),
        ChatClient::new(config.endpoint.clone()),
        RandomPicker::new(),
    )
}

/// Produces one activity per call, from the model when possible and from
/// the static pool otherwise. Never fails.
pub struct ActivitySource<G, K> {
    config: SourceConfig,
    generator: G,
    picker: K,
    prompt: String,
}

impl<G, K> ActivitySource<G, K>
where
    G: TextGenerator,
    K: IndexPicker,
{
    pub fn new(config: SourceConfig, generator: G, picker: K) -> Self {
        Self {
            config,
            generator,
            picker,
            prompt: PromptBuilder::build(),
        }
    }

    pub fn obtain_activity(&mut self) -> SourcedActivity {
        let api_key = match self.config.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key,
            _ => {
                tracing::info!("no API credential configured, using a canned activity");
                return self.fallback(FallbackReason::MissingCredential);
            }
        };

        let request = GenerationRequest {
            api_key,
            model: &self.config.model,
            prompt: &self.prompt,
            temperature: self.config.temperature,
        };

        let raw = match self.generator.generate(&request) {
            Ok(raw) => raw,
            Err(err) => {
                log_generation_error(&err);
                return self.fallback(FallbackReason::ApiError);
            }
        };

        tracing::debug!(raw = %raw, "model reply");

        match normalize_response(&raw) {
            ParsedResponse::Parsed(activity) => SourcedActivity {
                activity,
                origin: ActivityOrigin::Generated,
                error: None,
            },
            ParsedResponse::Recovered(activity) => SourcedActivity {
                activity,
                origin: ActivityOrigin::Recovered,
                error: None,
            },
            ParsedResponse::Unrecoverable => {
                tracing::warn!("model reply could not be recovered, using a canned activity");
                self.fallback(FallbackReason::Unrecoverable)
            }
        }
    }

    fn fallback(&mut self, reason: FallbackReason) -> SourcedActivity {
        SourcedActivity {
            activity: SOURCE_FALLBACKS.pick(&mut self.picker),
            origin: ActivityOrigin::Fallback(reason),
            error: (reason == FallbackReason::ApiError).then_some(API_ERROR),
        }
    }
}

fn log_generation_error(err: &GenerationError) {
    match err {
        GenerationError::Status { status, .. } => {
            tracing::warn!(status = *status, "generation API rejected the request: {err}")
        }
        _ => tracing::warn!("generation API call failed: {err}"),
    }
}

impl<G, K> ActivityProvider for ActivitySource<G, K>
where
    G: TextGenerator,
    K: IndexPicker,
{
    fn fetch(&mut self) -> anyhow::Result<SourceReply> {
        Ok(SourceReply::Delivered(self.obtain_activity()))
    }
}
