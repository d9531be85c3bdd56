use super::Agent;
use crate::errors::ProviderError;
use crate::providers::types::message::Message;

/// Sequential chainer: threads one input through an ordered list of step
/// instructions, feeding each step's reply into the next step's prompt.
pub struct Chainer {
    agent: Agent,
    steps: Vec<String>,
}

/// Final reply of a chain run plus the full transcript that produced it.
/// After k steps the transcript holds `2k + 1` messages: the system prompt
/// followed by k user/assistant pairs.
#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub output: String,
    pub transcript: Vec<Message>,
}

impl Chainer {
    pub fn new(agent: Agent, steps: Vec<String>) -> Self {
        Self { agent, steps }
    }

    pub fn with_max_tokens(mut self, max_tokens: i32) -> Self {
        self.agent.max_tokens = max_tokens;
        self
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub async fn run(&self, input: &str) -> Result<ChainOutput, ProviderError> {
        self.run_with_observer(input, |_, _| {}).await
    }

    /// Run the chain, invoking `on_step(index, reply)` after each step.
    ///
    /// Step i+1 never starts before step i's reply is received; the first
    /// failure aborts the whole chain and no partial result is salvaged.
    pub async fn run_with_observer<F>(
        &self,
        input: &str,
        mut on_step: F,
    ) -> Result<ChainOutput, ProviderError>
    where
        F: FnMut(usize, &str),
    {
        let mut transcript = vec![self.agent.system_message()];
        let mut current = input.to_string();

        for (ix, step) in self.steps.iter().enumerate() {
            transcript.push(Message::user(&format!("{step}\nInput: {current}")));
            let reply = self.agent.complete(&transcript).await?;
            on_step(ix, &reply);
            transcript.push(Message::assistant(&reply));
            current = reply;
        }

        Ok(ChainOutput {
            output: current,
            transcript,
        })
    }
}
