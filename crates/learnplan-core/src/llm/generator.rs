//! The `Generator` trait -- the seam between the step pipeline and the
//! text-generation backend.
//!
//! [`super::OllamaClient`] is the production implementation. Tests swap in
//! scripted generators so the pipeline and HTTP facade can be exercised
//! without a model running.

use async_trait::async_trait;

use super::LlmError;

/// A single-shot text generator.
///
/// # Object Safety
///
/// This trait is object-safe so the planner can hold an
/// `Arc<dyn Generator>` chosen at startup.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Model name reported in metadata and health responses.
    fn model(&self) -> &str;

    /// Base URL of the backend, for metadata.
    fn base_url(&self) -> &str;

    /// Generate text for `prompt`.
    ///
    /// One outbound call, no retries. Implementations must report a
    /// backend that cannot be reached as [`LlmError::Unreachable`].
    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> Result<String, LlmError>;
}

// Compile-time assertion: Generator must be object-safe.
const _: () = {
    fn _assert_object_safe(_: &dyn Generator) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoGenerator;

    #[async_trait]
    impl Generator for EchoGenerator {
        fn model(&self) -> &str {
            "echo"
        }

        fn base_url(&self) -> &str {
            "memory://"
        }

        async fn generate(
            &self,
            prompt: &str,
            system: Option<&str>,
            _temperature: f32,
        ) -> Result<String, LlmError> {
            Ok(format!("{}|{prompt}", system.unwrap_or("")))
        }
    }

    #[tokio::test]
    async fn generator_is_usable_as_trait_object() {
        let generator: Box<dyn Generator> = Box::new(EchoGenerator);
        assert_eq!(generator.model(), "echo");
        let out = generator.generate("hi", Some("sys"), 0.0).await.unwrap();
        assert_eq!(out, "sys|hi");
    }
}
