// src/analysis/llm_client.rs
use super::prompts::{build_user_prompt, ANALYSIS_SYSTEM_PROMPT};
use crate::environment::LlmConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

/// Produces free-text analysis for a resume / job description pair.
#[async_trait]
pub trait AnalysisGenerator: Send + Sync {
    async fn generate_analysis(&self, resume_text: &str, job_description: &str)
        -> Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client.
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    config: LlmConfig,
}

impl LlmClient {
    pub fn new(config: LlmConfig, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key,
            config,
        })
    }

    /// Reads the key from `OPENAI_API_KEY`; a missing key only fails at call time.
    pub fn from_env(config: LlmConfig) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        Self::new(config, api_key)
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub async fn send_completion(&self, system: &str, user: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .context("OPENAI_API_KEY environment variable not set")?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let url = format!(
            "{}/chat/completions",
            self.config.api_url.trim_end_matches('/')
        );
        info!("Sending request to analysis model {} at {}", self.config.model, url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to analysis model")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Analysis model error {}: {}", status, error_text);
            anyhow::bail!("Analysis model returned error {}: {}", status, error_text);
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .context("Failed to parse analysis model response")?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .context("Analysis model returned no choices")?;

        info!("Received {} chars from analysis model", content.len());
        Ok(content)
    }
}

#[async_trait]
impl AnalysisGenerator for LlmClient {
    async fn generate_analysis(&self, resume_text: &str, job_description: &str) -> Result<String> {
        let prompt = build_user_prompt(resume_text, job_description);
        self.send_completion(ANALYSIS_SYSTEM_PROMPT, &prompt).await
    }
}
