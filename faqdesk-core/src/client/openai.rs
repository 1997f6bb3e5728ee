use super::traits::{ChatMessage, CompletionClient, CompletionRequest};
use super::types::ClientError;
use crate::config::model::CompletionSettings;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    #[serde(default)]
    message: Option<ChatCompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAIClient {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAIClient {
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Self {
        Self::with_timeout(api_url, api_key, model, Duration::from_secs(30))
    }

    pub fn with_timeout(
        api_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
    ) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            api_url,
            api_key,
            model,
        }
    }

    pub fn from_settings(settings: &CompletionSettings) -> Self {
        Self::with_timeout(
            settings.api_url.clone(),
            settings.api_key.clone(),
            settings.model.clone(),
            Duration::from_secs(settings.timeout_seconds),
        )
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// 空字符串视为未配置
    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.trim().is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    fn build_request_headers(&self) -> Result<HeaderMap, ClientError> {
        let api_key = self.api_key().ok_or(ClientError::MissingApiKey)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", api_key).parse().map_err(|e| {
                ClientError::HeaderParseError(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(
            CONTENT_TYPE,
            "application/json".parse().map_err(|e| {
                ClientError::HeaderParseError(format!("Invalid content-type header: {}", e))
            })?,
        );

        Ok(headers)
    }

    // 发送聊天完成请求
    pub async fn chat_completions(&self, request: &CompletionRequest) -> Result<String, ClientError> {
        let headers = self.build_request_headers()?;

        let response = self
            .client
            .post(&self.api_url)
            .headers(headers)
            .json(&request.to_openai_json())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ClientError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_default();

        debug!(
            "Completion received from {} ({} chars)",
            self.api_url,
            answer.len()
        );
        Ok(answer)
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClientError> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
        };
        self.chat_completions(&request).await
    }
}
