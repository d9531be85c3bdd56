use async_trait::async_trait;
use reqwest::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

use super::{
    base::{Provider, Usage},
    configs::openai::OpenAiProviderConfig,
    types::message::Message,
    utils::{check_openai_context_length_error, messages_to_openai_spec, openai_response_to_message},
};
use crate::errors::ProviderError;

/// Chat-completions client over HTTP. One outbound request per `complete`
/// call; no state is retained between calls and no request timeout is set,
/// so a hung completion blocks its caller.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiProviderConfig,
}

impl OpenAiProvider {
    pub fn new(config: OpenAiProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn get_usage(data: &Value) -> Result<Usage, ProviderError> {
        let usage = data
            .get("usage")
            .ok_or_else(|| ProviderError::Response("no usage data in response".to_string()))?;

        let input_tokens = usage
            .get("prompt_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let output_tokens = usage
            .get("completion_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32);

        let total_tokens = usage
            .get("total_tokens")
            .and_then(|v| v.as_i64())
            .map(|v| v as i32)
            .or_else(|| match (input_tokens, output_tokens) {
                (Some(input), Some(output)) => Some(input + output),
                _ => None,
            });

        Ok(Usage::new(input_tokens, output_tokens, total_tokens))
    }

    async fn post(&self, payload: Value) -> Result<Value, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&payload)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(response.json().await?),
            status if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() >= 500 => {
                Err(ProviderError::Server(status))
            }
            status => Err(ProviderError::Status(status)),
        }
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        max_tokens: i32,
    ) -> Result<(Message, Usage), ProviderError> {
        if messages.is_empty() {
            return Err(ProviderError::EmptyConversation);
        }
        if max_tokens < 1 {
            return Err(ProviderError::InvalidTokenCeiling(max_tokens));
        }

        let payload = json!({
            "model": model,
            "messages": messages_to_openai_spec(messages),
            "max_tokens": max_tokens,
        });

        let response = self.post(payload).await?;

        // Raise specific error if context length is exceeded
        if let Some(error) = response.get("error") {
            if let Some(err) = check_openai_context_length_error(error) {
                return Err(err);
            }
            return Err(ProviderError::Api(error.to_string()));
        }

        let message = openai_response_to_message(&response)?;
        let usage = Self::get_usage(&response)?;

        Ok((message, usage))
    }
}
