use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a remote completion call. Always propagated to the immediate
/// caller; nothing in this crate retries or suppresses one.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server error: {0}")]
    Server(StatusCode),

    #[error("request failed with status: {0}")]
    Status(StatusCode),

    #[error("API error: {0}")]
    Api(String),

    #[error("unexpected response shape: {0}")]
    Response(String),

    #[error("input conversation too long: {0}")]
    ContextLengthExceeded(String),

    #[error("conversation must contain at least one message")]
    EmptyConversation,

    #[error("max_tokens must be positive, got {0}")]
    InvalidTokenCeiling(i32),

    #[error("worker task failed: {0}")]
    Worker(String),
}

/// Failure to read structured data out of free-form model output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no routing label found in response: {0}")]
    NoLabel(String),

    #[error("could not parse table value cell: {0}")]
    BadValueCell(String),
}
