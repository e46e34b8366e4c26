//! Google Gemini provider over the `generateContent` REST endpoint.

use crate::error::LlmError;
use crate::llm::{
    build_provider_client, sanitize_api_error,
    traits::{Provider, ProviderFuture},
};
use reqwest::Client;

mod types;
use types::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const PROVIDER: &str = "Gemini";
const MAX_OUTPUT_TOKENS: u32 = 8192;

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    /// Create a provider. A blank key counts as missing.
    pub fn new(api_key: Option<&str>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a provider that talks to `base_url` instead of Google.
    pub fn with_base_url(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_provider_client(),
        }
    }

    fn build_request(
        system_prompt: Option<&str>,
        message: &str,
        temperature: f64,
    ) -> GenerateContentRequest {
        let system_instruction = system_prompt.map(|sys| Content {
            role: None,
            parts: vec![Part {
                text: sys.to_string(),
            }],
        });

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
            system_instruction,
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn request_error(err: &reqwest::Error) -> LlmError {
        LlmError::Request {
            provider: PROVIDER.to_string(),
            message: sanitize_api_error(&err.to_string()),
        }
    }

    async fn ensure_success_status(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, LlmError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GenerateContentResponse>(&body)
            .ok()
            .and_then(|r| r.error)
            .map_or(body, |e| e.message);
        Err(LlmError::Status {
            provider: PROVIDER.to_string(),
            status: status.as_u16(),
            message: sanitize_api_error(&message),
        })
    }

    fn extract_text(result: GenerateContentResponse) -> Result<String, LlmError> {
        if let Some(err) = result.error {
            return Err(LlmError::Request {
                provider: PROVIDER.to_string(),
                message: sanitize_api_error(&err.message),
            });
        }

        let text = result
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if !text.trim().is_empty() {
            return Ok(text);
        }

        if let Some(reason) = result.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Request {
                provider: PROVIDER.to_string(),
                message: format!("prompt blocked ({reason})"),
            });
        }
        Err(LlmError::EmptyResponse {
            provider: PROVIDER.to_string(),
        })
    }

    async fn call_api(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f64,
    ) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        let url = format!(
            "{}/{}:generateContent",
            self.base_url,
            Self::model_name(model)
        );
        let request = Self::build_request(system_prompt, message, temperature);

        tracing::debug!(model, prompt_chars = message.len(), "Gemini request");
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::request_error(&e.without_url()))?;
        let response = Self::ensure_success_status(response).await?;
        let result: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| Self::request_error(&e.without_url()))?;

        Self::extract_text(result)
    }
}

impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn chat_with_system<'a>(
        &'a self,
        system_prompt: Option<&'a str>,
        message: &'a str,
        model: &'a str,
        temperature: f64,
    ) -> ProviderFuture<'a> {
        Box::pin(self.call_api(system_prompt, message, model, temperature))
    }
}
