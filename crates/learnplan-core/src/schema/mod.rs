//! Response schemas and per-step validation.
//!
//! Steps 1-3 produce a [`Question`]; step 4 produces a [`LearningPlan`].
//! [`validate`] dispatches on [`Step`]; [`validate_step`] is the
//! string-keyed entry point and rejects unknown step identifiers.

pub mod plan;
pub mod question;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use plan::{LearningPlan, LearningTask};
pub use question::Question;

/// Errors from validating a parsed payload against its step's schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    /// Missing field, wrong type, or a declared bound rejected while deserializing.
    #[error("response does not match schema: {0}")]
    Shape(String),

    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("Must have at least 2 options (got {count})")]
    TooFewOptions { count: usize },

    #[error("Must have at most 6 options (got {count})")]
    TooManyOptions { count: usize },

    #[error("Plan must have exactly 7 days (got {count})")]
    PlanLength { count: usize },

    #[error("plan entry {entry}: day {day} is outside 1-7")]
    DayOutOfRange { entry: usize, day: i64 },

    #[error("plan entry {entry}: {field} must be {min}-{max} characters (got {len})")]
    FieldLength {
        entry: usize,
        field: &'static str,
        len: usize,
        min: usize,
        max: usize,
    },

    #[error("plan entry {entry}: time_required must specify minutes (got {value:?})")]
    TimeWithoutMinutes { entry: usize, value: String },

    #[error("Plan must cover days 1-7 exactly once (got days {days:?})")]
    DaySet { days: Vec<i64> },

    #[error("step {step} produced a {found}, not a {expected}")]
    WrongKind {
        step: Step,
        expected: &'static str,
        found: &'static str,
    },
}

/// One of the four onboarding steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Background question.
    Step1,
    /// Background-specific follow-up question.
    Step2,
    /// Daily time commitment question.
    Step3,
    /// The 7-day plan.
    Step4,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Step1, Step::Step2, Step::Step3, Step::Step4];

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Step1 => "step1",
            Step::Step2 => "step2",
            Step::Step3 => "step3",
            Step::Step4 => "step4",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidStep(s.to_string()))
    }
}

/// A payload that passed its step's schema.
///
/// Serializes as the bare question or plan object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Validated {
    Question(Question),
    Plan(LearningPlan),
}

impl Validated {
    fn kind(&self) -> &'static str {
        match self {
            Validated::Question(_) => "question",
            Validated::Plan(_) => "plan",
        }
    }

    pub fn into_question(self, step: Step) -> Result<Question, ValidationError> {
        match self {
            Validated::Question(q) => Ok(q),
            other => Err(ValidationError::WrongKind {
                step,
                expected: "question",
                found: other.kind(),
            }),
        }
    }

    pub fn into_plan(self, step: Step) -> Result<LearningPlan, ValidationError> {
        match self {
            Validated::Plan(p) => Ok(p),
            other => Err(ValidationError::WrongKind {
                step,
                expected: "plan",
                found: other.kind(),
            }),
        }
    }
}

/// Validate `value` against the schema for `step`.
pub fn validate(step: Step, value: Value) -> Result<Validated, ValidationError> {
    match step {
        Step::Step1 | Step::Step2 | Step::Step3 => Question::from_value(value).map(Validated::Question),
        Step::Step4 => LearningPlan::from_value(value).map(Validated::Plan),
    }
}

/// Validate `value` against the schema named by `step_id` (`"step1"`..`"step4"`).
pub fn validate_step(step_id: &str, value: Value) -> Result<Validated, ValidationError> {
    validate(step_id.parse()?, value)
}
