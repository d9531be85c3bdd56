use futures::future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use super::Agent;
use crate::errors::ProviderError;
use crate::providers::types::message::Message;

pub const DEFAULT_WORKERS: usize = 3;

/// Parallel fan-out executor: maps one instruction over N independent inputs,
/// each as its own single-turn conversation. A semaphore bounds the number of
/// in-flight calls to the worker count; excess tasks queue on a permit.
pub struct FanOut {
    agent: Agent,
    instruction: String,
    workers: usize,
}

impl FanOut {
    pub fn new(agent: Agent, instruction: impl Into<String>) -> Self {
        Self {
            agent,
            instruction: instruction.into(),
            workers: DEFAULT_WORKERS,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    fn spawn_all(&self, inputs: Vec<String>) -> Vec<JoinHandle<Result<String, ProviderError>>> {
        let semaphore = Arc::new(Semaphore::new(self.workers));
        inputs
            .into_iter()
            .map(|input| {
                let agent = self.agent.clone();
                let instruction = self.instruction.clone();
                let semaphore = Arc::clone(&semaphore);
                tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| ProviderError::Worker(e.to_string()))?;
                    let messages = vec![
                        agent.system_message(),
                        Message::user(&format!("{instruction}\nInput: {input}")),
                    ];
                    agent.complete(&messages).await
                })
            })
            .collect()
    }

    /// Dispatch every input and collect outputs in submission order, so
    /// `out[i]` corresponds to `in[i]` regardless of completion order.
    ///
    /// The first failure encountered while collecting propagates. Siblings
    /// already in flight are not cancelled; they run to completion even
    /// though their results are discarded.
    pub async fn run(&self, inputs: Vec<String>) -> Result<Vec<String>, ProviderError> {
        let handles = self.spawn_all(inputs);
        let mut outputs = Vec::with_capacity(handles.len());
        for handle in handles {
            let output = handle
                .await
                .map_err(|e| ProviderError::Worker(e.to_string()))??;
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// Collect-all variant: one outcome per input, in submission order, with
    /// per-input failures reported instead of aborting the batch.
    pub async fn run_settled(&self, inputs: Vec<String>) -> Vec<Result<String, ProviderError>> {
        let handles = self.spawn_all(inputs);
        future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(ProviderError::Worker(e.to_string())),
            })
            .collect()
    }
}
