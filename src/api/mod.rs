// Chat-completion API client

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::models::{AppConfig, ChatMessage};

/// System instruction sent ahead of every draft.
pub const SCREENPLAY_SYSTEM_PROMPT: &str = "You are a screenwriting assistant. Always format the output as a properly formatted screenplay. Follow these guidelines:

Scene Headings: uppercase, format [INT./EXT.] [LOCATION] - [TIME OF DAY]. Example: INT. SUBURBAN HOME - NIGHT.
Action Lines: present tense, plain sentences, no indentation.
Character Names: centered, uppercase, before dialogue.
Dialogue: beneath character name, no quotation marks.
Parentheticals: indented, below character name, before dialogue.
Transitions: uppercase, right-aligned (e.g. CUT TO:, FADE OUT.).
Numbering: start with \"FADE IN:\", end with \"FADE OUT.\", number each new scene at the left margin.";

/// Returned in place of a completion when the service sends no content.
pub const EMPTY_RESPONSE_FALLBACK: &str = "No response generated";

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API key not set: environment variable {0} is missing or empty")]
    MissingApiKey(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    base_url: String,
    model: String,
    api_key_env: String,
    client: Client,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerationRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

impl GenerationRequest {
    /// Pair the fixed screenplay instruction with the user's draft.
    pub fn screenplay(model: impl Into<String>, draft: &str) -> Self {
        Self {
            model: model.into(),
            messages: vec![
                ChatMessage::system(SCREENPLAY_SYSTEM_PROMPT),
                ChatMessage::user(draft),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, or the fallback literal when it is absent.
    pub fn into_text(self) -> Result<String, GenerationError> {
        let first = self.choices.into_iter().next().ok_or_else(|| {
            GenerationError::MalformedResponse("response contained no choices".to_string())
        })?;

        Ok(first
            .message
            .content
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| EMPTY_RESPONSE_FALLBACK.to_string()))
    }
}

impl ChatClient {
    pub fn new(
        base_url: String,
        model: String,
        api_key_env: String,
        request_timeout: u64,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout))
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key_env,
            client,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, GenerationError> {
        Self::new(
            config.api_base_url.clone(),
            config.model.clone(),
            config.api_key_env.clone(),
            config.request_timeout,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Read the key fresh on every call so a changed environment is picked up.
    fn api_key(&self) -> Result<String, GenerationError> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| GenerationError::MissingApiKey(self.api_key_env.clone()))
    }

    pub async fn complete(&self, request: &GenerationRequest) -> Result<String, GenerationError> {
        let api_key = self.api_key()?;
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        parsed.into_text()
    }

    /// Turn a story draft into screenplay text.
    pub async fn generate_screenplay(&self, draft: &str) -> Result<String, GenerationError> {
        let request = GenerationRequest::screenplay(self.model.clone(), draft);
        tracing::info!(model = %self.model, draft_chars = draft.chars().count(), "requesting screenplay");
        let text = self.complete(&request).await?;
        tracing::info!(response_chars = text.chars().count(), "screenplay received");
        Ok(text)
    }
}
