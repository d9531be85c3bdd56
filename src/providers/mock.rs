use async_trait::async_trait;
use std::sync::Mutex;

use super::base::{Provider, Usage};
use super::types::message::Message;
use crate::errors::ProviderError;

/// A scripted provider for tests: pops pre-configured outcomes in order and
/// records every conversation it receives.
pub struct MockProvider {
    outcomes: Mutex<Vec<Result<String, ProviderError>>>,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl MockProvider {
    pub fn new(outcomes: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Convenience constructor for a sequence of successful replies.
    pub fn replies(texts: &[&str]) -> Self {
        Self::new(texts.iter().map(|t| Ok(t.to_string())).collect())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Conversations received so far, in call order.
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        _model: &str,
        messages: &[Message],
        _max_tokens: i32,
    ) -> Result<(Message, Usage), ProviderError> {
        if messages.is_empty() {
            return Err(ProviderError::EmptyConversation);
        }
        self.calls.lock().unwrap().push(messages.to_vec());

        let mut outcomes = self.outcomes.lock().unwrap();
        if outcomes.is_empty() {
            // Keep answering once the script runs out, like a quiet model
            Ok((Message::assistant(""), Usage::default()))
        } else {
            let text = outcomes.remove(0)?;
            Ok((Message::assistant(&text), Usage::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[tokio::test]
    async fn test_scripted_outcomes_in_order() {
        let provider = MockProvider::new(vec![
            Ok("first".to_string()),
            Err(ProviderError::Server(StatusCode::INTERNAL_SERVER_ERROR)),
        ]);
        let messages = vec![Message::user("hi")];

        let (reply, _) = provider.complete("m", &messages, 10).await.unwrap();
        assert_eq!(reply.text(), "first");

        let result = provider.complete("m", &messages, 10).await;
        assert!(matches!(result, Err(ProviderError::Server(_))));

        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_records_conversations() {
        let provider = MockProvider::replies(&["ok"]);
        let messages = vec![Message::system("s"), Message::user("u")];
        provider.complete("m", &messages, 10).await.unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 2);
        assert_eq!(calls[0][1].text(), "u");
    }
}
