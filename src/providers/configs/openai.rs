use anyhow::{Context, Result};
use std::env;

pub const OPENAI_DEFAULT_HOST: &str = "https://api.openai.com";

pub struct OpenAiProviderConfig {
    pub api_key: String,
    pub host: String,
}

impl OpenAiProviderConfig {
    pub fn new(api_key: String, host: String) -> Self {
        Self { api_key, host }
    }

    /// Read the key from `OPENAI_API_KEY` and the host from
    /// `OPENAI_API_HOST`, falling back to the public endpoint.
    pub fn from_env() -> Result<Self> {
        let api_key =
            env::var("OPENAI_API_KEY").context("OPENAI_API_KEY environment variable is not set")?;
        let host =
            env::var("OPENAI_API_HOST").unwrap_or_else(|_| OPENAI_DEFAULT_HOST.to_string());
        Ok(Self::new(api_key, host))
    }
}
