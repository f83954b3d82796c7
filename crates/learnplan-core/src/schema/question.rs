//! Onboarding question shape (steps 1-3).

use std::ops::RangeInclusive;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ValidationError;

/// Allowed number of answer options.
pub const OPTIONS_BOUNDS: RangeInclusive<usize> = 2..=6;

/// A multiple-choice onboarding question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub question_text: String,
    #[serde(deserialize_with = "bounded_options")]
    pub options: Vec<String>,
}

impl Question {
    /// Deserialize and validate a generated payload.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let question: Question =
            serde_json::from_value(value).map_err(|e| ValidationError::Shape(e.to_string()))?;
        question.validate()?;
        Ok(question)
    }

    /// Check field contents.
    ///
    /// The option count is checked here as well as during deserialization,
    /// so hand-built values are held to the same bounds.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("question_id", &self.question_id)?;
        require_non_empty("question_text", &self.question_text)?;

        let count = self.options.len();
        if count < *OPTIONS_BOUNDS.start() {
            return Err(ValidationError::TooFewOptions { count });
        }
        if count > *OPTIONS_BOUNDS.end() {
            return Err(ValidationError::TooManyOptions { count });
        }
        Ok(())
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    Ok(())
}

fn bounded_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let options = Vec::<String>::deserialize(deserializer)?;
    if !OPTIONS_BOUNDS.contains(&options.len()) {
        return Err(de::Error::invalid_length(
            options.len(),
            &"between 2 and 6 options",
        ));
    }
    Ok(options)
}
