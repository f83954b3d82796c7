//! LLM client error types.

use thiserror::Error;

/// Errors from talking to the generation endpoint.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The endpoint could not be reached at all (connection refused, DNS, ...).
    #[error(
        "Could not connect to Ollama at {url}. Make sure Ollama is running.\n\
         Install: https://ollama.com\n\
         Run: ollama serve"
    )]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Ollama API error: HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Ollama API error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Ollama API error: invalid reply: {0}")]
    InvalidReply(String),
}

impl LlmError {
    /// Whether this error means the endpoint is not running or not reachable.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, LlmError::Unreachable { .. })
    }

    /// Classify a reqwest failure for a request sent to `url`.
    pub(crate) fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_connect() {
            LlmError::Unreachable {
                url: url.to_string(),
                source: err,
            }
        } else {
            LlmError::Transport(err)
        }
    }
}
