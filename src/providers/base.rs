use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::message::Message;
use crate::errors::ProviderError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: Option<i32>,
    pub output_tokens: Option<i32>,
    pub total_tokens: Option<i32>,
}

impl Usage {
    pub fn new(
        input_tokens: Option<i32>,
        output_tokens: Option<i32>,
        total_tokens: Option<i32>,
    ) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens,
        }
    }
}

/// Base trait for chat-completion providers (OpenAI, compatible hosts, mocks).
///
/// One logical operation: send an ordered, non-empty conversation plus a model
/// identifier and a token ceiling, get back the top response message. Errors
/// are surfaced as-is; implementations do not retry.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(
        &self,
        model: &str,
        messages: &[Message],
        max_tokens: i32,
    ) -> Result<(Message, Usage), ProviderError>;
}
