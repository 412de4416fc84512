//! Chat completion capability.
//!
//! Defines the [`ChatModel`] trait the response composer depends on, and the
//! [`OpenRouterChat`] implementation for OpenAI-compatible
//! `/chat/completions` endpoints (OpenRouter by default). Uses the same
//! retry policy as the embedding client: backoff on 429/5xx, immediate
//! failure on other client errors.

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::config::LlmConfig;

/// Language-model capability. May fail transiently; callers decide how to
/// recover.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Complete a two-role prompt and return the generated text.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// Chat model backed by an OpenAI-compatible chat completions API.
///
/// Requires the `OPENROUTER_API_KEY` environment variable.
pub struct OpenRouterChat {
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    api_key: String,
    max_retries: u32,
    client: reqwest::Client,
}

impl OpenRouterChat {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENROUTER_API_KEY environment variable not set"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            api_key,
            max_retries: config.max_retries,
            client,
        })
    }
}

#[async_trait]
impl ChatModel for OpenRouterChat {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = self
                .client
                .post(&url)
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("Content-Type", "application/json")
                .json(&body)
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        let json: serde_json::Value = response.json().await?;
                        return parse_chat_response(&json);
                    }

                    if status.as_u16() == 429 || status.is_server_error() {
                        let body_text = response.text().await.unwrap_or_default();
                        last_err =
                            Some(anyhow::anyhow!("Chat API error {}: {}", status, body_text));
                        continue;
                    }

                    let body_text = response.text().await.unwrap_or_default();
                    bail!("Chat API error {}: {}", status, body_text);
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("Chat completion failed after retries")))
    }
}

/// Extract `choices[0].message.content` from a chat completions response.
/// An absent or empty content field is an error; the composer maps it to a
/// user-facing fallback.
fn parse_chat_response(json: &serde_json::Value) -> Result<String> {
    let content = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|c| c.first())
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|c| c.as_str())
        .ok_or_else(|| anyhow::anyhow!("Malformed chat response: missing message content"))?;

    if content.trim().is_empty() {
        bail!("Chat response was empty");
    }

    Ok(content.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_response() {
        let json = serde_json::json!({
            "choices": [
                {"message": {"role": "assistant", "content": "Try turning it off and on."}}
            ]
        });
        assert_eq!(
            parse_chat_response(&json).unwrap(),
            "Try turning it off and on."
        );
    }

    #[test]
    fn test_parse_chat_response_missing_choices() {
        let json = serde_json::json!({"error": {"message": "overloaded"}});
        assert!(parse_chat_response(&json).is_err());
    }

    #[test]
    fn test_parse_chat_response_empty_content() {
        let json = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "   "}}]
        });
        assert!(parse_chat_response(&json).is_err());
    }
}
