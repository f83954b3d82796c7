//! Ollama HTTP client.
//!
//! Talks to the `/api/generate` endpoint for generation and to
//! `/api/version` / `/api/tags` for setup diagnostics.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Generator, LlmError, OllamaConfig};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
    format: &'static str,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    #[serde(default)]
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionReply {
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsReply {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// A locally installed model as reported by `/api/tags`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    /// Size on disk in bytes.
    #[serde(default)]
    pub size: u64,
}

/// Client for a locally running Ollama server.
///
/// Configuration is fixed at construction; the client is cheap to share
/// behind an `Arc`.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: OllamaConfig,
    http: Client,
}

impl OllamaClient {
    /// Build a client from configuration.
    pub fn new(config: OllamaConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }

    /// Query the server version. Returns `"unknown"` when the field is absent.
    pub async fn version(&self) -> Result<String, LlmError> {
        let url = self.config.endpoint("/api/version");
        let body = self.get(&url).await?;
        let reply: VersionReply =
            serde_json::from_str(&body).map_err(|e| LlmError::InvalidReply(e.to_string()))?;
        Ok(reply.version.unwrap_or_else(|| "unknown".to_string()))
    }

    /// List locally installed models.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let url = self.config.endpoint("/api/tags");
        let body = self.get(&url).await?;
        let reply: TagsReply =
            serde_json::from_str(&body).map_err(|e| LlmError::InvalidReply(e.to_string()))?;
        Ok(reply.models)
    }

    async fn get(&self, url: &str) -> Result<String, LlmError> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(url, e))?;
        read_body(url, resp).await
    }
}

/// Read a response body, turning non-2xx statuses into [`LlmError::Status`].
async fn read_body(url: &str, resp: reqwest::Response) -> Result<String, LlmError> {
    let status = resp.status();
    let text = resp
        .text()
        .await
        .map_err(|e| LlmError::from_reqwest(url, e))?;
    if !status.is_success() {
        return Err(LlmError::Status {
            status: status.as_u16(),
            body: text,
        });
    }
    Ok(text)
}

#[async_trait]
impl Generator for OllamaClient {
    fn model(&self) -> &str {
        &self.config.model
    }

    fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> Result<String, LlmError> {
        let url = self.config.endpoint("/api/generate");
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            system: system.filter(|s| !s.is_empty()),
            stream: false,
            format: "json",
            options: GenerateOptions {
                temperature,
                num_predict: self.config.num_predict,
            },
        };
        debug!(model = %self.config.model, prompt_len = prompt.len(), "generate: sending");

        let resp = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::from_reqwest(&url, e))?;
        let body = read_body(&url, resp).await?;

        let reply: GenerateReply =
            serde_json::from_str(&body).map_err(|e| LlmError::InvalidReply(e.to_string()))?;
        let text = reply.response.unwrap_or_default();
        debug!(response_len = text.len(), "generate: received");
        Ok(text)
    }
}
