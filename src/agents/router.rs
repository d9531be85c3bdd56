use thiserror::Error;

use super::Agent;
use crate::errors::ProviderError;
use crate::providers::types::message::Message;

#[derive(Error, Debug)]
#[error("router requires a non-empty set of choices")]
pub struct EmptyChoices;

/// Single-call classifier: asks the model to pick the best-fitting label
/// from a fixed choice set and hands back the raw response text.
///
/// The response is NOT validated against the choice set here; label
/// extraction is the caller's concern (see `evals::extract_label`).
pub struct Router {
    agent: Agent,
    choices: Vec<String>,
}

impl Router {
    pub fn new(agent: Agent, choices: Vec<String>) -> Result<Self, EmptyChoices> {
        if choices.is_empty() {
            return Err(EmptyChoices);
        }
        Ok(Self { agent, choices })
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    /// Issue exactly one remote call and return its raw response text.
    pub async fn route(&self, input: &str) -> Result<String, ProviderError> {
        let prompt = format!(
            "Analyze the following data {} and based on the data select \
             the most appropriate of the following options: {}",
            input.trim(),
            format_choices(&self.choices),
        );
        let messages = vec![self.agent.system_message(), Message::user(&prompt)];
        self.agent.complete(&messages).await
    }
}

fn format_choices(choices: &[String]) -> String {
    let quoted: Vec<String> = choices.iter().map(|c| format!("'{c}'")).collect();
    format!("[{}]", quoted.join(", "))
}
