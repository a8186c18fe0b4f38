//! LLM API client for recipe suggestions

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::AiError;
use crate::retry::RetryPolicy;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODELS: &[&str] = &["gemini-2.0-flash", "gemini-2.0-pro"];

/// LLM provider configuration
#[derive(Debug, Clone)]
pub enum LlmProvider {
    Gemini {
        api_key: String,
        /// Tried in order; a model that stays unavailable hands over to the next.
        models: Vec<String>,
        base_url: String,
    },
    OpenAI {
        api_key: String,
        model: String,
        base_url: String,
    },
    Anthropic {
        api_key: String,
        model: String,
    },
}

/// Whether the caller expects a JSON document back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Text,
    Json,
}

/// LLM client for generating recipes and answers
#[derive(Debug)]
pub struct LlmClient {
    provider: LlmProvider,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(provider: LlmProvider) -> Self {
        Self {
            provider,
            client: reqwest::Client::new(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn provider(&self) -> &LlmProvider {
        &self.provider
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Create a client from environment variables
    pub fn from_env() -> Result<Self, AiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the provider through `lookup`. Gemini wins, then OpenAI, then Anthropic.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AiError> {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = non_empty("GEMINI_API_KEY") {
            let models = non_empty("GEMINI_MODELS")
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|model| !model.is_empty())
                        .map(String::from)
                        .collect::<Vec<_>>()
                })
                .filter(|models| !models.is_empty())
                .unwrap_or_else(|| DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect());
            let base_url =
                non_empty("GEMINI_API_BASE").unwrap_or_else(|| GEMINI_API_BASE.to_string());
            Ok(Self::new(LlmProvider::Gemini {
                api_key,
                models,
                base_url,
            }))
        } else if let Some(api_key) = non_empty("OPENAI_API_KEY") {
            let model = non_empty("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o".to_string());
            let base_url =
                non_empty("OPENAI_API_BASE").unwrap_or_else(|| "https://api.openai.com".to_string());
            Ok(Self::new(LlmProvider::OpenAI {
                api_key,
                model,
                base_url,
            }))
        } else if let Some(api_key) = non_empty("ANTHROPIC_API_KEY") {
            let model = non_empty("ANTHROPIC_MODEL")
                .unwrap_or_else(|| "claude-sonnet-4-20250514".to_string());
            Ok(Self::new(LlmProvider::Anthropic { api_key, model }))
        } else {
            Err(AiError::NotConfigured)
        }
    }

    /// Generate a plain-text response
    pub async fn generate(&self, system_prompt: &str, user_prompt: &str) -> Result<String, AiError> {
        self.generate_with(system_prompt, user_prompt, ResponseFormat::Text, |text| {
            Ok(text.trim().to_string())
        })
        .await
    }

    /// Generate a response and run it through `parse`.
    ///
    /// Parsing happens inside the retry loop, so unparseable output costs an
    /// attempt like any other transient failure.
    pub async fn generate_with<T, P>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        format: ResponseFormat,
        parse: P,
    ) -> Result<T, AiError>
    where
        P: Fn(&str) -> Result<T, AiError>,
    {
        let parse = &parse;
        match &self.provider {
            LlmProvider::Gemini {
                api_key,
                models,
                base_url,
            } => {
                let mut last_error = AiError::NotConfigured;
                for (i, model) in models.iter().enumerate() {
                    let result = self
                        .retry
                        .run(model, move |_| async move {
                            let text = self
                                .call_gemini(api_key, model, base_url, system_prompt, user_prompt, format)
                                .await?;
                            parse(&text)
                        })
                        .await;

                    match result {
                        Ok(value) => return Ok(value),
                        Err(err) if err.is_retryable() && i + 1 < models.len() => {
                            warn!("Gemini model {} unavailable ({}), falling back", model, err);
                            last_error = err;
                        }
                        Err(err) => return Err(err),
                    }
                }
                Err(last_error)
            }
            LlmProvider::OpenAI {
                api_key,
                model,
                base_url,
            } => {
                self.retry
                    .run("OpenAI", move |_| async move {
                        let text = self
                            .call_openai(api_key, model, base_url, system_prompt, user_prompt, format)
                            .await?;
                        parse(&text)
                    })
                    .await
            }
            LlmProvider::Anthropic { api_key, model } => {
                self.retry
                    .run("Anthropic", move |_| async move {
                        let text = self
                            .call_anthropic(api_key, model, system_prompt, user_prompt)
                            .await?;
                        parse(&text)
                    })
                    .await
            }
        }
    }

    async fn call_gemini(
        &self,
        api_key: &str,
        model: &str,
        base_url: &str,
        system_prompt: &str,
        user_prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError> {
        #[derive(Serialize)]
        struct GeminiRequest {
            contents: Vec<GeminiContent>,
            #[serde(skip_serializing_if = "Option::is_none")]
            system_instruction: Option<GeminiContent>,
            #[serde(skip_serializing_if = "Option::is_none")]
            generation_config: Option<GenerationConfig>,
        }

        #[derive(Serialize, Deserialize)]
        struct GeminiContent {
            #[serde(default, skip_serializing_if = "Option::is_none")]
            role: Option<String>,
            #[serde(default)]
            parts: Vec<GeminiPart>,
        }

        #[derive(Serialize, Deserialize)]
        struct GeminiPart {
            #[serde(default)]
            text: String,
        }

        #[derive(Serialize)]
        struct GenerationConfig {
            response_mime_type: String,
        }

        #[derive(Deserialize)]
        struct GeminiResponse {
            candidates: Option<Vec<GeminiCandidate>>,
        }

        #[derive(Deserialize)]
        struct GeminiCandidate {
            content: Option<GeminiContent>,
        }

        let text_content = |role: Option<&str>, text: &str| GeminiContent {
            role: role.map(String::from),
            parts: vec![GeminiPart {
                text: text.to_string(),
            }],
        };

        let request = GeminiRequest {
            contents: vec![text_content(Some("user"), user_prompt)],
            system_instruction: (!system_prompt.is_empty()).then(|| text_content(None, system_prompt)),
            generation_config: (format == ResponseFormat::Json).then(|| GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };

        debug!("Calling Gemini API at {} with model: {}", base_url, model);

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", base_url, model))
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                provider: "Gemini",
                status,
                body,
            });
        }

        let response: GeminiResponse = response.json().await?;
        let content = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.trim().is_empty())
            .ok_or(AiError::EmptyResponse("Gemini"))?;

        info!("Received response from Gemini ({})", model);
        Ok(content)
    }

    async fn call_openai(
        &self,
        api_key: &str,
        model: &str,
        base_url: &str,
        system_prompt: &str,
        user_prompt: &str,
        format: ResponseFormat,
    ) -> Result<String, AiError> {
        #[derive(Serialize)]
        struct OpenAIRequest {
            model: String,
            messages: Vec<OpenAIMessage>,
            temperature: f32,
            #[serde(skip_serializing_if = "Option::is_none")]
            response_format: Option<OpenAIResponseFormat>,
        }

        #[derive(Serialize)]
        struct OpenAIMessage {
            role: String,
            content: String,
        }

        #[derive(Serialize)]
        struct OpenAIResponseFormat {
            #[serde(rename = "type")]
            kind: String,
        }

        #[derive(Deserialize)]
        struct OpenAIResponse {
            choices: Vec<OpenAIChoice>,
        }

        #[derive(Deserialize)]
        struct OpenAIChoice {
            message: OpenAIMessageContent,
        }

        #[derive(Deserialize)]
        struct OpenAIMessageContent {
            content: Option<String>,
        }

        let mut messages = Vec::with_capacity(2);
        if !system_prompt.is_empty() {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            });
        }
        messages.push(OpenAIMessage {
            role: "user".to_string(),
            content: user_prompt.to_string(),
        });

        let request = OpenAIRequest {
            model: model.to_string(),
            messages,
            temperature: 0.7,
            response_format: (format == ResponseFormat::Json).then(|| OpenAIResponseFormat {
                kind: "json_object".to_string(),
            }),
        };

        debug!(
            "Calling OpenAI-compatible API at {} with model: {}",
            base_url, model
        );

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                provider: "OpenAI",
                status,
                body,
            });
        }

        let response: OpenAIResponse = response.json().await?;
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.trim().is_empty())
            .ok_or(AiError::EmptyResponse("OpenAI"))?;

        info!("Received response from OpenAI");
        Ok(content)
    }

    async fn call_anthropic(
        &self,
        api_key: &str,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AiError> {
        #[derive(Serialize)]
        struct AnthropicRequest {
            model: String,
            max_tokens: u32,
            #[serde(skip_serializing_if = "String::is_empty")]
            system: String,
            messages: Vec<AnthropicMessage>,
        }

        #[derive(Serialize)]
        struct AnthropicMessage {
            role: String,
            content: String,
        }

        #[derive(Deserialize)]
        struct AnthropicResponse {
            content: Vec<AnthropicContent>,
        }

        #[derive(Deserialize)]
        struct AnthropicContent {
            #[serde(default)]
            text: String,
        }

        let request = AnthropicRequest {
            model: model.to_string(),
            max_tokens: 4096,
            system: system_prompt.to_string(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: user_prompt.to_string(),
            }],
        };

        debug!("Calling Anthropic API with model: {}", model);

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                provider: "Anthropic",
                status,
                body,
            });
        }

        let response: AnthropicResponse = response.json().await?;
        let content = response
            .content
            .into_iter()
            .map(|c| c.text)
            .collect::<String>();
        if content.trim().is_empty() {
            return Err(AiError::EmptyResponse("Anthropic"));
        }

        info!("Received response from Anthropic");
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_from_lookup_no_keys() {
        match LlmClient::from_lookup(lookup(&[])) {
            Err(e) => assert!(e.to_string().contains("No LLM API key found")),
            Ok(_) => panic!("Expected error when no API keys are set"),
        }
    }

    #[test]
    fn test_from_lookup_prefers_gemini() {
        let client = LlmClient::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("OPENAI_API_KEY", "o-key"),
        ]))
        .unwrap();
        match client.provider() {
            LlmProvider::Gemini {
                api_key,
                models,
                base_url,
            } => {
                assert_eq!(api_key, "g-key");
                assert_eq!(models, &vec!["gemini-2.0-flash".to_string(), "gemini-2.0-pro".to_string()]);
                assert_eq!(base_url, GEMINI_API_BASE);
            }
            other => panic!("expected Gemini, got {:?}", other),
        }
    }

    #[test]
    fn test_from_lookup_parses_model_list() {
        let client = LlmClient::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "g-key"),
            ("GEMINI_MODELS", " gemini-2.5-flash , ,gemini-1.5-pro"),
        ]))
        .unwrap();
        assert!(matches!(
            client.provider(),
            LlmProvider::Gemini { models, .. } if models == &vec!["gemini-2.5-flash".to_string(), "gemini-1.5-pro".to_string()]
        ));
    }

    #[test]
    fn test_from_lookup_openai_defaults() {
        let client = LlmClient::from_lookup(lookup(&[("OPENAI_API_KEY", "o-key")])).unwrap();
        assert!(matches!(
            client.provider(),
            LlmProvider::OpenAI { model, base_url, .. } if model == "gpt-4o" && base_url == "https://api.openai.com"
        ));
    }

    #[test]
    fn test_from_lookup_skips_blank_keys() {
        let client = LlmClient::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "  "),
            ("ANTHROPIC_API_KEY", "a-key"),
        ]))
        .unwrap();
        assert!(matches!(client.provider(), LlmProvider::Anthropic { .. }));
    }

    #[test]
    fn test_with_retry() {
        let policy = RetryPolicy::new(5, std::time::Duration::from_millis(10));
        let client = LlmClient::new(LlmProvider::Anthropic {
            api_key: "key".to_string(),
            model: "model".to_string(),
        })
        .with_retry(policy);
        assert_eq!(client.retry_policy(), policy);
    }
}
