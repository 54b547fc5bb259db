use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, eyre};
use log::{debug, info};
use serde_json::json;

use crate::utils::config::LLMConfig;

/// A single-shot text completion: one system message, one user message,
/// one text answer.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    fn model(&self) -> &str;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints.
pub struct ChatCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl ChatCompletionClient {
    pub fn from_config(config: &LLMConfig) -> Result<Self> {
        Self::from_config_with(config, |var| std::env::var(var).ok())
    }

    /// Builds the client, resolving the model id through `env` first.
    ///
    /// A missing model id is reported as [`crate::error::ConfigError`] before
    /// anything touches the network.
    pub fn from_config_with(
        config: &LLMConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let model = config.resolve_model_with(env)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!("using model {} at {}", model, config.endpoint);

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.resolve_api_key(),
            model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionClient for ChatCompletionClient {
    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        debug!("prompt length: {} characters", prompt.len());

        let request_body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user", "content": prompt }
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let url = format!("{}/chat/completions", self.endpoint.trim_end_matches('/'));

        let mut req = self.client.post(&url).json(&request_body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await?;
            return Err(eyre!("completion request failed ({}): {}", status, error_body));
        }

        let body: serde_json::Value = response.json().await?;

        let content = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|t| t.as_str())
            .ok_or_else(|| eyre!("invalid completion response structure"))?;

        Ok(content.to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
