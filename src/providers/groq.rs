//! Groq chat-completions client (OpenAI-compatible API)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;

use crate::config::GroqConfig;
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;
use crate::types::response::Citation;

use super::llm::LlmProvider;

/// Groq API client with automatic retry
pub struct GroqClient {
    client: Client,
    config: GroqConfig,
    api_key: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl GroqClient {
    /// Create a new client, reading the API key from the configured
    /// environment variable
    pub fn new(config: &GroqConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).map_err(|_| {
            Error::Config(format!(
                "Groq backend selected but {} is not set",
                config.api_key_env
            ))
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            api_key,
        })
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    last_error = Some(e);
                    if attempt < max_retries {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Groq request failed (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Llm("Unknown error".to_string())))
    }

    /// Check if the API is reachable with the configured key
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);

        match self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Run a chat completion with a system + user message pair
    pub async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let system = system.to_string();
        let user = user.to_string();
        let model = self.config.model.clone();
        let temperature = self.config.temperature;
        let client = self.client.clone();
        let api_key = self.api_key.clone();

        self.retry_request(|| {
            let url = url.clone();
            let system = system.clone();
            let user = user.clone();
            let model = model.clone();
            let client = client.clone();
            let api_key = api_key.clone();

            async move {
                let request = ChatRequest {
                    model,
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
                    temperature,
                };

                let response = client
                    .post(&url)
                    .bearer_auth(&api_key)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::Llm(format!("Chat request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::Llm(format!(
                        "Chat completion failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let chat_response: ChatResponse = response
                    .json()
                    .await
                    .map_err(|e| Error::Llm(format!("Failed to parse chat response: {}", e)))?;

                chat_response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|c| c.message.content)
                    .ok_or_else(|| Error::Llm("Chat completion returned no choices".to_string()))
            }
        })
        .await
    }
}

/// Groq answer generation provider
pub struct GroqLlm {
    client: GroqClient,
}

impl GroqLlm {
    /// Create a new provider from config
    pub fn new(config: &GroqConfig) -> Result<Self> {
        Ok(Self {
            client: GroqClient::new(config)?,
        })
    }
}

#[async_trait]
impl LlmProvider for GroqLlm {
    async fn generate_answer(
        &self,
        question: &str,
        context: &str,
        citations: &[Citation],
    ) -> Result<String> {
        let system = PromptBuilder::system_prompt();
        let user = PromptBuilder::build_user_prompt(question, context, citations);
        self.client.chat(&system, &user).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "groq"
    }

    fn model(&self) -> &str {
        &self.client.config.model
    }
}
