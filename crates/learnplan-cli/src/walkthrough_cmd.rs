//! `learnplan walkthrough`: run all four steps once from the terminal.

use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use learnplan_core::OnboardingPlanner;

/// Answers fed into steps 2 and 4.
#[derive(Debug, Clone)]
pub struct Answers {
    pub background: String,
    pub focus: String,
    pub time: String,
}

/// Run steps 1-4 in order, printing each validated payload as pretty JSON.
///
/// Stops at the first failing step.
pub async fn run_walkthrough(
    planner: &OnboardingPlanner,
    answers: &Answers,
    out: &mut impl Write,
) -> Result<()> {
    let q1 = planner
        .background_question()
        .await
        .context("step 1 (background) failed")?;
    print_step(out, "STEP 1: Background", &q1)?;

    let q2 = planner
        .followup_question(&answers.background)
        .await
        .context("step 2 (follow-up) failed")?;
    print_step(
        out,
        &format!("STEP 2: Follow-up for {}", answers.background),
        &q2,
    )?;

    let q3 = planner
        .time_question()
        .await
        .context("step 3 (time commitment) failed")?;
    print_step(out, "STEP 3: Time commitment", &q3)?;

    let plan = planner
        .learning_plan(&answers.background, &answers.focus, &answers.time)
        .await
        .context("step 4 (learning plan) failed")?;
    print_step(out, "STEP 4: 7-day learning plan", &plan)?;

    writeln!(out)?;
    writeln!(out, "All steps completed.")?;
    Ok(())
}

fn print_step(out: &mut impl Write, title: &str, payload: &impl Serialize) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))?;
    writeln!(out, "{}", serde_json::to_string_pretty(payload)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use learnplan_test_utils::{
        ScriptedGenerator, UnreachableGenerator, background_question_json, plan_json,
        tech_followup_json, time_question_json,
    };

    fn answers() -> Answers {
        Answers {
            background: "Tech".to_string(),
            focus: "Frontend".to_string(),
            time: "10 minutes".to_string(),
        }
    }

    #[tokio::test]
    async fn prints_every_step() {
        let generator = ScriptedGenerator::new([
            background_question_json().to_string(),
            tech_followup_json().to_string(),
            time_question_json().to_string(),
            plan_json("10 minutes").to_string(),
        ]);
        let planner = OnboardingPlanner::new(generator.clone());

        let mut out = Vec::new();
        run_walkthrough(&planner, &answers(), &mut out).await.unwrap();
        let report = String::from_utf8(out).unwrap();

        assert!(report.contains("STEP 1: Background"));
        assert!(report.contains("STEP 2: Follow-up for Tech"));
        assert!(report.contains("\"question_id\": \"time_commitment\""));
        assert_eq!(report.matches("\"time_required\": \"10 minutes\"").count(), 7);
        assert!(report.ends_with("All steps completed.\n"));
        assert_eq!(generator.calls().len(), 4);
    }

    #[test]
    fn underline_matches_title_width_for_non_ascii() {
        let mut out = Vec::new();
        print_step(&mut out, "STEP 2: Follow-up for Diseño", &serde_json::json!({})).unwrap();
        let report = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines[1], "STEP 2: Follow-up for Diseño");
        assert_eq!(lines[2].len(), lines[1].chars().count());
    }

    #[tokio::test]
    async fn stops_at_first_failure() {
        let generator = ScriptedGenerator::new([
            background_question_json().to_string(),
            "not json".to_string(),
        ]);
        let planner = OnboardingPlanner::new(generator.clone());

        let mut out = Vec::new();
        let err = run_walkthrough(&planner, &answers(), &mut out)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("step 2"), "got: {err:#}");
        assert_eq!(generator.calls().len(), 2);
        assert!(String::from_utf8(out).unwrap().contains("STEP 1: Background"));
    }

    #[tokio::test]
    async fn unreachable_backend_fails_step_one() {
        let planner = OnboardingPlanner::new(UnreachableGenerator::new().await);
        let mut out = Vec::new();
        let err = run_walkthrough(&planner, &answers(), &mut out)
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("ollama serve"), "got: {err:#}");
    }
}
