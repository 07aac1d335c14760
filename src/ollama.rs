// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Ollama API client for local AI inference

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::{RenamerError, Result};

const MAX_BACKOFF_SECS: u64 = 60;

/// Anything that turns a prompt into a completion.
///
/// The candidate generator only talks to this trait, so tests can swap in a
/// canned reply instead of a live model.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Return the model's full reply to `prompt`
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Ollama API client
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    retries: u32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client from the engine settings
    pub fn new(engine: &EngineConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(engine.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(&engine.url),
            model: engine.model.clone(),
            retries: engine.retries,
        })
    }

    /// Model used for completions
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Base URL with any `/api/...` endpoint suffix removed
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<()> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                RenamerError::Inference(format!(
                    "Cannot connect to Ollama at {}: {}",
                    self.base_url, e
                ))
            })?;

        if !response.status().is_success() {
            return Err(RenamerError::Inference(format!(
                "Ollama returned status {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// List available models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client
            .get(&url)
            .send()
            .await?;

        let tags: TagsResponse = response.json().await?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Check if the configured model is available
    pub async fn model_available(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models.iter().any(|m| self.is_configured_model(m)))
    }

    /// Whether an installed model name refers to the configured model
    pub fn is_configured_model(&self, available: &str) -> bool {
        model_matches(available, &self.model)
    }

    /// Generate text completion
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);

        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        debug!("Sending request to Ollama: model={}, prompt_chars={}", self.model, prompt.chars().count());

        let response = self.client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RenamerError::Inference(format!("Request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(RenamerError::Inference(format!(
                "Ollama returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RenamerError::Inference(format!("Failed to read response body: {}", e)))?;
        let result: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| RenamerError::Inference(format!("Malformed response JSON: {}", e)))?;

        Ok(result.response)
    }

    /// Generate with retry logic
    pub async fn generate_with_retry(&self, prompt: &str) -> Result<String> {
        let mut last_error = None;

        for attempt in 0..=self.retries {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!("Retrying Ollama request in {:?} (attempt {})", delay, attempt + 1);
                tokio::time::sleep(delay).await;
            }

            match self.generate(prompt).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RenamerError::Inference("Unknown error".to_string())
        }))
    }
}

#[async_trait]
impl CompletionBackend for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.generate_with_retry(prompt).await
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim_end_matches('/')
        .replace("/api/generate", "")
        .replace("/api/chat", "")
}

/// 1s, 2s, 4s, ... capped at [`MAX_BACKOFF_SECS`]
fn backoff_delay(attempt: u32) -> Duration {
    let secs = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_secs(secs.min(MAX_BACKOFF_SECS))
}

/// `llama3.1` matches `llama3.1:latest` and `llama3.1:8b`
fn model_matches(available: &str, wanted: &str) -> bool {
    available == wanted
        || available
            .strip_prefix(wanted)
            .is_some_and(|rest| rest.starts_with(':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://localhost:11434/api/generate"), "http://localhost:11434");
        assert_eq!(normalize_base_url("http://localhost:11434/"), "http://localhost:11434");
        assert_eq!(normalize_base_url("http://gpu-box:11434/api/chat"), "http://gpu-box:11434");
    }

    #[test]
    fn test_model_matches_tags() {
        assert!(model_matches("llama3.1:latest", "llama3.1"));
        assert!(model_matches("llama3.1:8b", "llama3.1"));
        assert!(model_matches("llama3.1", "llama3.1"));
        assert!(!model_matches("llama3.10:latest", "llama3.1"));
        assert!(!model_matches("mistral:latest", "llama3.1"));
    }

    #[test]
    fn test_backoff_is_capped() {
        assert_eq!(backoff_delay(1), Duration::from_secs(1));
        assert_eq!(backoff_delay(3), Duration::from_secs(4));
        assert_eq!(backoff_delay(65), Duration::from_secs(MAX_BACKOFF_SECS));
        assert_eq!(backoff_delay(u32::MAX), Duration::from_secs(MAX_BACKOFF_SECS));
    }

    #[test]
    fn test_configured_model_marker() {
        let client = OllamaClient::new(&EngineConfig::default()).unwrap();
        assert!(client.is_configured_model("llama3.1:latest"));
        assert!(!client.is_configured_model("llama3.10:latest"));
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateRequest { model: "llama3.1", prompt: "hi", stream: false };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json, serde_json::json!({ "model": "llama3.1", "prompt": "hi", "stream": false }));
    }
}
