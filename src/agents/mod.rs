//! Prompting-pattern agents: sequential chaining, routing, parallel fan-out.

pub mod chain;
pub mod fanout;
pub mod pipeline;
pub mod router;

pub use chain::{ChainOutput, Chainer};
pub use fanout::FanOut;
pub use router::Router;

use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::base::Provider;
use crate::providers::types::message::Message;

pub const DEFAULT_MAX_TOKENS: i32 = 1000;

/// Shared core of every agent: a provider handle, a system prompt, and the
/// per-call completion parameters. All configuration is passed in explicitly;
/// no ambient state is consulted after construction.
#[derive(Clone)]
pub struct Agent {
    provider: Arc<dyn Provider>,
    system_prompt: String,
    model: String,
    max_tokens: i32,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn Provider>,
        system_prompt: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            system_prompt: system_prompt.into(),
            model: model.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn system_message(&self) -> Message {
        Message::system(&self.system_prompt)
    }

    /// Send a transcript and return the assistant's reply text.
    pub(crate) async fn complete(&self, messages: &[Message]) -> Result<String, ProviderError> {
        let (reply, _usage) = self
            .provider
            .complete(&self.model, messages, self.max_tokens)
            .await?;
        Ok(reply.text())
    }
}
