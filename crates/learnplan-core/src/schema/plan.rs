//! 7-day learning plan shape (step 4).

use std::ops::RangeInclusive;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ValidationError;

/// Number of days in a plan.
pub const PLAN_DAYS: usize = 7;

pub const DAY_BOUNDS: RangeInclusive<i64> = 1..=7;
pub const TITLE_BOUNDS: RangeInclusive<usize> = 3..=100;
pub const DESCRIPTION_BOUNDS: RangeInclusive<usize> = 10..=300;

/// One day of a learning plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningTask {
    #[serde(deserialize_with = "lenient_day")]
    pub day: i64,
    pub title: String,
    pub what_to_learn: String,
    pub what_to_do: String,
    /// Free text such as "10 minutes"; must mention minutes.
    pub time_required: String,
}

/// A complete plan: exactly one task for each of days 1 through 7.
///
/// Entries keep the order the model produced them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPlan {
    #[serde(deserialize_with = "seven_entries")]
    pub plan: Vec<LearningTask>,
}

impl LearningTask {
    /// Check field bounds. `entry` is the 1-based position in the plan, used
    /// in error messages.
    pub fn validate(&self, entry: usize) -> Result<(), ValidationError> {
        if !DAY_BOUNDS.contains(&self.day) {
            return Err(ValidationError::DayOutOfRange {
                entry,
                day: self.day,
            });
        }
        check_length(entry, "title", &self.title, &TITLE_BOUNDS)?;
        check_length(entry, "what_to_learn", &self.what_to_learn, &DESCRIPTION_BOUNDS)?;
        check_length(entry, "what_to_do", &self.what_to_do, &DESCRIPTION_BOUNDS)?;
        if !self.time_required.to_lowercase().contains("minute") {
            return Err(ValidationError::TimeWithoutMinutes {
                entry,
                value: self.time_required.clone(),
            });
        }
        Ok(())
    }
}

impl LearningPlan {
    /// Deserialize and validate a generated payload.
    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        let plan: LearningPlan =
            serde_json::from_value(value).map_err(|e| ValidationError::Shape(e.to_string()))?;
        plan.validate()?;
        Ok(plan)
    }

    /// Check every entry, the entry count, then that days 1-7 each appear once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (i, task) in self.plan.iter().enumerate() {
            task.validate(i + 1)?;
        }

        if self.plan.len() != PLAN_DAYS {
            return Err(ValidationError::PlanLength {
                count: self.plan.len(),
            });
        }

        let mut days: Vec<i64> = self.plan.iter().map(|t| t.day).collect();
        days.sort_unstable();
        if !days.iter().copied().eq(DAY_BOUNDS) {
            return Err(ValidationError::DaySet { days });
        }
        Ok(())
    }
}

fn check_length(
    entry: usize,
    field: &'static str,
    value: &str,
    bounds: &RangeInclusive<usize>,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if !bounds.contains(&len) {
        return Err(ValidationError::FieldLength {
            entry,
            field,
            len,
            min: *bounds.start(),
            max: *bounds.end(),
        });
    }
    Ok(())
}

/// Day number as the model may write it.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDay {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Accept `3`, `3.0` or `"3"`; reject fractional or non-numeric days.
fn lenient_day<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawDay::deserialize(deserializer)? {
        RawDay::Int(day) => Ok(day),
        RawDay::Float(day) if day.is_finite() && day.fract() == 0.0 && day.abs() < 1e15 => {
            Ok(day as i64)
        }
        RawDay::Float(day) => Err(de::Error::invalid_value(
            de::Unexpected::Float(day),
            &"a whole day number",
        )),
        RawDay::Text(text) => text.trim().parse().map_err(|_| {
            de::Error::invalid_value(de::Unexpected::Str(&text), &"a whole day number")
        }),
    }
}

fn seven_entries<'de, D>(deserializer: D) -> Result<Vec<LearningTask>, D::Error>
where
    D: Deserializer<'de>,
{
    let plan = Vec::<LearningTask>::deserialize(deserializer)?;
    if plan.len() != PLAN_DAYS {
        return Err(de::Error::invalid_length(plan.len(), &"exactly 7 days"));
    }
    Ok(plan)
}
