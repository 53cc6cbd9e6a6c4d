use std::sync::Arc;

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::AppConfig;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::Assistant => "assistant",
            Role::User => "user",
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
}

// Only the fields needed to get at the reply text. Groq returns the
// same shape as OpenAI:
// {"choices": [{"index": 0, "message": {"role": "assistant", "content": "..."}}], ...}
#[derive(Debug, Deserialize)]
struct CompletionChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

/// Anything that can turn an ordered list of messages into the next
/// assistant reply.
#[async_trait]
pub trait CompletionClient {
    async fn completion(&self, model: &str, messages: &[Message]) -> Result<String, Error>;
}

pub type DynCompletionClient = dyn CompletionClient + Send + Sync + 'static;
pub type SharedCompletionClient = Arc<DynCompletionClient>;

/// Client for Groq's OpenAI compatible chat completions API.
#[derive(Clone, Debug)]
pub struct GroqClient {
    api_hostname: String,
    api_key: String,
    http: reqwest::Client,
}

impl GroqClient {
    pub fn new(api_hostname: &str, api_key: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Returns `None` when no API key is configured rather than
    /// failing so the chat can still run and explain what's missing.
    pub fn from_config(config: &AppConfig) -> Option<Self> {
        match &config.groq_api_key {
            Some(key) => Some(Self::new(&config.groq_api_hostname, key)),
            None => {
                tracing::warn!("GROQ_API_KEY is not set. Completions are disabled.");
                None
            }
        }
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.api_hostname.trim_end_matches("/")
        )
    }
}

#[async_trait]
impl CompletionClient for GroqClient {
    async fn completion(&self, model: &str, messages: &[Message]) -> Result<String, Error> {
        let payload = CompletionRequest {
            model,
            messages,
            stream: false,
        };

        tracing::debug!(
            "Requesting completion from {} with {} messages",
            model,
            messages.len()
        );

        let response: CompletionResponse = self
            .http
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(anyhow!("No message received from model {}", model))
    }
}
