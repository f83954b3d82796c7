//! Text-generation backend: the [`Generator`] trait and its Ollama
//! implementation.

pub mod config;
pub mod error;
pub mod generator;
pub mod ollama;

pub use config::OllamaConfig;
pub use error::LlmError;
pub use generator::Generator;
pub use ollama::{ModelInfo, OllamaClient};
