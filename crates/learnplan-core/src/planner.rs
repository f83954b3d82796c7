//! The onboarding pipeline: prompt -> generate -> extract -> validate.
//!
//! Each step is one linear pass with a single generation call. Nothing is
//! retried and nothing is carried between calls.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::extract::{ExtractError, extract_json};
use crate::llm::{Generator, LlmError};
use crate::prompt::{self, SYSTEM_PROMPT};
use crate::schema::{self, LearningPlan, Question, Step, Validated, ValidationError};

/// Temperature used for every step; output should be reproducible.
pub const STEP_TEMPERATURE: f32 = 0.0;

const HEALTH_PROMPT: &str = "Say 'ok'";
const HEALTH_SYSTEM: &str = "Respond with exactly: ok";

/// Any failure along the pipeline.
#[derive(Debug, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PlannerError {
    /// Whether the generation backend could not be reached.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, PlannerError::Llm(e) if e.is_unreachable())
    }
}

/// Runs onboarding steps against a shared [`Generator`].
#[derive(Clone)]
pub struct OnboardingPlanner {
    generator: Arc<dyn Generator>,
}

impl OnboardingPlanner {
    pub fn new(generator: Arc<dyn Generator>) -> Self {
        Self { generator }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    pub fn base_url(&self) -> &str {
        self.generator.base_url()
    }

    /// Step 1: ask for the user's background.
    pub async fn background_question(&self) -> Result<Question, PlannerError> {
        let validated = self.run(Step::Step1, prompt::step1()).await?;
        Ok(validated.into_question(Step::Step1)?)
    }

    /// Step 2: a follow-up question tailored to `background`.
    pub async fn followup_question(&self, background: &str) -> Result<Question, PlannerError> {
        let validated = self.run(Step::Step2, prompt::step2(background)).await?;
        Ok(validated.into_question(Step::Step2)?)
    }

    /// Step 3: ask for the daily time commitment.
    pub async fn time_question(&self) -> Result<Question, PlannerError> {
        let validated = self.run(Step::Step3, prompt::step3()).await?;
        Ok(validated.into_question(Step::Step3)?)
    }

    /// Step 4: generate the 7-day plan.
    pub async fn learning_plan(
        &self,
        background: &str,
        focus_goal: &str,
        time: &str,
    ) -> Result<LearningPlan, PlannerError> {
        info!(background, focus_goal, time, "generating learning plan");
        let prompt = prompt::step4(background, focus_goal, time);
        let validated = self.run(Step::Step4, prompt).await?;
        Ok(validated.into_plan(Step::Step4)?)
    }

    /// Probe the backend with a trivial deterministic generation.
    pub async fn health_check(&self) -> Result<(), PlannerError> {
        self.generator
            .generate(HEALTH_PROMPT, Some(HEALTH_SYSTEM), STEP_TEMPERATURE)
            .await?;
        Ok(())
    }

    /// Run one step end to end.
    pub async fn run(&self, step: Step, prompt: String) -> Result<Validated, PlannerError> {
        debug!(%step, "run: generating");
        let text = self
            .generator
            .generate(&prompt, Some(SYSTEM_PROMPT), STEP_TEMPERATURE)
            .await?;
        let value = extract_json(&text)?;
        let validated = schema::validate(step, value)?;
        debug!(%step, "run: validated");
        Ok(validated)
    }
}

impl std::fmt::Debug for OnboardingPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnboardingPlanner")
            .field("model", &self.model())
            .field("base_url", &self.base_url())
            .finish()
    }
}
