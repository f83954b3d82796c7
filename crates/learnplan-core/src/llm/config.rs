use std::env;
use std::time::Duration;

/// Connection settings for the Ollama generation endpoint.
///
/// [`OllamaConfig::from_env_or`] reads `LEARNPLAN_OLLAMA_URL` and
/// `LEARNPLAN_MODEL` from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    /// Base URL of the Ollama server, without a trailing path.
    pub base_url: String,
    /// Model name passed on every generation request.
    pub model: String,
    /// Upper bound on generated tokens (`options.num_predict`).
    pub num_predict: u32,
    /// Whole-request timeout. `None` leaves the transport default in place.
    pub timeout: Option<Duration>,
}

impl OllamaConfig {
    /// The default base URL used when no environment variable is set.
    pub const DEFAULT_URL: &str = "http://localhost:11434";

    /// The default model.
    pub const DEFAULT_MODEL: &str = "llama3.2";

    /// Enough room for a full 7-day plan.
    pub const DEFAULT_NUM_PREDICT: u32 = 4096;

    /// Environment variable overriding the base URL.
    pub const URL_ENV: &str = "LEARNPLAN_OLLAMA_URL";

    /// Environment variable overriding the model.
    pub const MODEL_ENV: &str = "LEARNPLAN_MODEL";

    /// Build a config from the environment.
    ///
    /// Priority: `LEARNPLAN_OLLAMA_URL` / `LEARNPLAN_MODEL`, then the given
    /// fallbacks.
    pub fn from_env_or(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let base_url = env::var(Self::URL_ENV).unwrap_or_else(|_| base_url.into());
        let model = env::var(Self::MODEL_ENV).unwrap_or_else(|_| model.into());
        Self::new(base_url, model)
    }

    /// Build a config from an explicit URL and model (useful for tests and CLI flags).
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            num_predict: Self::DEFAULT_NUM_PREDICT,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_num_predict(mut self, num_predict: u32) -> Self {
        self.num_predict = num_predict;
        self
    }

    /// Join the base URL with an API path, tolerating a trailing slash on the base.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}
