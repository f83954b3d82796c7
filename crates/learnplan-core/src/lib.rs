//! Core of the learning planner: prompts, the Ollama client, and the
//! extraction/validation pipeline that turns generated text into typed
//! onboarding questions and 7-day plans.

pub mod extract;
pub mod llm;
pub mod planner;
pub mod prompt;
pub mod schema;

pub use extract::{ExtractError, extract_json};
pub use llm::{Generator, LlmError, OllamaClient, OllamaConfig};
pub use planner::{OnboardingPlanner, PlannerError};
pub use schema::{LearningPlan, LearningTask, Question, Step, Validated, ValidationError};
