//! End-to-end tests for the onboarding pipeline.
//!
//! Runs `OnboardingPlanner` against both scripted generators and a real
//! `OllamaClient` talking to the fake Ollama server.

use std::sync::Arc;

use learnplan_core::prompt::{self, SYSTEM_PROMPT};
use learnplan_core::{OllamaClient, OllamaConfig, OnboardingPlanner, PlannerError};
use learnplan_test_utils::{
    FakeReply, ScriptedGenerator, UnreachableGenerator, background_question_json, plan_json,
    plan_json_with_days, spawn_fake_ollama, tech_followup_json, time_question_json,
};

#[tokio::test]
async fn full_onboarding_flow() {
    let generator = ScriptedGenerator::new([
        background_question_json().to_string(),
        tech_followup_json().to_string(),
        time_question_json().to_string(),
        plan_json("10 minutes").to_string(),
    ]);
    let planner = OnboardingPlanner::new(generator.clone());

    let q1 = planner.background_question().await.unwrap();
    assert_eq!(q1.options, vec!["Tech", "Product", "Design", "Non-tech"]);

    let q2 = planner.followup_question("Tech").await.unwrap();
    assert_eq!(q2.question_id, "tech_focus");

    let q3 = planner.time_question().await.unwrap();
    assert_eq!(q3.question_id, "time_commitment");

    let plan = planner
        .learning_plan("Tech", "Frontend", "10 minutes")
        .await
        .unwrap();
    assert_eq!(plan.plan.len(), 7);
    assert!(plan.plan.iter().all(|t| t.time_required == "10 minutes"));

    let calls = generator.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[0].prompt, prompt::step1());
    assert_eq!(calls[1].prompt, prompt::step2("Tech"));
    assert_eq!(calls[2].prompt, prompt::step3());
    assert_eq!(
        calls[3].prompt,
        prompt::step4("Tech", "Frontend", "10 minutes")
    );
    assert!(
        calls
            .iter()
            .all(|c| c.system.as_deref() == Some(SYSTEM_PROMPT) && c.temperature == 0.0)
    );
}

#[tokio::test]
async fn plan_prompt_carries_time_into_every_slot() {
    let generator = ScriptedGenerator::always_json(&plan_json("10 minutes"));
    let planner = OnboardingPlanner::new(generator.clone());
    planner
        .learning_plan("Tech", "Frontend", "10 minutes")
        .await
        .unwrap();

    let sent = &generator.calls()[0].prompt;
    assert_eq!(sent.matches("\"time_required\": \"10 minutes\"").count(), 7);
    assert!(sent.contains("EXACTLY 7 days"));
}

#[tokio::test]
async fn unknown_background_uses_non_tech_prompt() {
    let generator = ScriptedGenerator::always_json(&tech_followup_json());
    let planner = OnboardingPlanner::new(generator.clone());
    planner.followup_question("Astronaut").await.unwrap();

    assert_eq!(generator.calls()[0].prompt, prompt::step2("Non-tech"));
}

#[tokio::test]
async fn permuted_plan_is_accepted() {
    let reply = plan_json_with_days(&[7, 6, 5, 4, 3, 2, 1], "5 minutes");
    let planner = OnboardingPlanner::new(ScriptedGenerator::always_json(&reply));
    let plan = planner
        .learning_plan("Design", "UI/UX", "5 minutes")
        .await
        .unwrap();
    assert_eq!(plan.plan[0].day, 7);
}

#[tokio::test]
async fn plan_with_gap_is_rejected() {
    let reply = plan_json_with_days(&[1, 2, 3, 4, 5, 6, 6], "5 minutes");
    let planner = OnboardingPlanner::new(ScriptedGenerator::always_json(&reply));
    let err = planner
        .learning_plan("Design", "UI/UX", "5 minutes")
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::Validation(_)));
    assert!(err.to_string().contains("days 1-7"), "got: {err}");
}

#[tokio::test]
async fn prose_wrapped_reply_is_recovered() {
    let reply = format!(
        "Here is your question:\n{}\nGood luck!",
        time_question_json()
    );
    let planner = OnboardingPlanner::new(ScriptedGenerator::new([reply]));
    assert!(planner.time_question().await.is_ok());
}

#[tokio::test]
async fn unreachable_generator_reports_unreachable() {
    let planner = OnboardingPlanner::new(UnreachableGenerator::new().await);

    let err = planner.background_question().await.unwrap_err();
    assert!(err.is_unreachable());

    let err = planner.health_check().await.unwrap_err();
    assert!(err.is_unreachable());
}

#[tokio::test]
async fn pipeline_over_http_with_fenced_reply() {
    let fenced = format!("```json\n{}\n```", plan_json("20 minutes"));
    let server = spawn_fake_ollama(FakeReply::Text(fenced)).await;
    let client = OllamaClient::new(OllamaConfig::new(server.base_url(), "llama3.2")).unwrap();
    let planner = OnboardingPlanner::new(Arc::new(client));

    let plan = planner
        .learning_plan("Non-tech", "Curiosity", "20 minutes")
        .await
        .unwrap();
    assert_eq!(plan.plan.len(), 7);

    let requests = server.requests();
    assert_eq!(requests[0]["system"], SYSTEM_PROMPT);
    assert_eq!(requests[0]["format"], "json");
}
