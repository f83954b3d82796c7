//! Prompt construction for the four onboarding steps.
//!
//! Every builder is a pure function of its inputs and cannot fail. Each
//! prompt spells out the exact JSON shape the schema in [`crate::schema`]
//! will later enforce.

/// System prompt sent with every step.
pub const SYSTEM_PROMPT: &str = "You are a structured learning plan generator. \
You do NOT engage in conversation.

Output ONLY valid JSON. No markdown, no explanations, no text outside JSON.

Follow the exact schema provided in each request.";

const STEP1: &str = r#"Generate the initial onboarding question.

Output schema:
{
  "question_id": "background",
  "question_text": "What's your background?",
  "options": ["Tech", "Product", "Design", "Non-tech"]
}

Return JSON only."#;

const STEP2_TECH: &str = r#"User background: Tech

Generate the next question to understand their technical role.

Output schema:
{
  "question_id": "string",
  "question_text": "string",
  "options": ["option1", "option2", ...]
}

Return JSON only."#;

const STEP2_PRODUCT: &str = r#"User background: Product

Generate the next question to understand their product focus.

Output schema:
{
  "question_id": "string",
  "question_text": "string",
  "options": ["option1", "option2", ...]
}

Return JSON only."#;

const STEP2_DESIGN: &str = r#"User background: Design

Generate the next question to understand their design discipline.

Output schema:
{
  "question_id": "string",
  "question_text": "string",
  "options": ["option1", "option2", ...]
}

Return JSON only."#;

const STEP2_NON_TECH: &str = r#"User background: Non-tech

Generate the next question to understand why they want to learn AI.

IMPORTANT: Do NOT include "Others" or "Please specify" options. Only include specific, clear choices.

Output schema:
{
  "question_id": "nontech_goal",
  "question_text": "Why do you want to learn AI?",
  "options": ["Career growth", "Curiosity", "Work efficiency", "Business idea", "Personal development", "Stay current with technology"]
}

Return JSON only."#;

const STEP3: &str = r#"Generate the time commitment question.

Output schema:
{
  "question_id": "time_commitment",
  "question_text": "How much time can you spend daily?",
  "options": ["5 minutes", "10 minutes", "20 minutes"]
}

Return JSON only."#;

/// The four answers offered by the step 1 question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Tech,
    Product,
    Design,
    NonTech,
}

impl Background {
    /// Map a step 1 answer to a background. Anything unrecognized is
    /// treated as `NonTech`.
    pub fn from_answer(answer: &str) -> Self {
        match answer {
            "Tech" => Background::Tech,
            "Product" => Background::Product,
            "Design" => Background::Design,
            _ => Background::NonTech,
        }
    }

    fn followup_prompt(self) -> &'static str {
        match self {
            Background::Tech => STEP2_TECH,
            Background::Product => STEP2_PRODUCT,
            Background::Design => STEP2_DESIGN,
            Background::NonTech => STEP2_NON_TECH,
        }
    }
}

/// Step 1: the background question.
pub fn step1() -> String {
    STEP1.to_string()
}

/// Step 2: the follow-up question for a background answer.
pub fn step2(background: &str) -> String {
    Background::from_answer(background)
        .followup_prompt()
        .to_string()
}

/// Step 3: the daily time commitment question.
pub fn step3() -> String {
    STEP3.to_string()
}

/// Step 4: the 7-day plan, with `time` echoed verbatim into every
/// `time_required` slot of the example structure.
pub fn step4(background: &str, focus_goal: &str, time: &str) -> String {
    let mut prompt = String::with_capacity(3072);

    prompt.push_str("Create a 7-day AI learning plan for this user:\n");
    prompt.push_str(&format!("- Background: {background}\n"));
    prompt.push_str(&format!("- Focus/Goal: {focus_goal}\n"));
    prompt.push_str(&format!("- Time per day: {time}\n\n"));
    prompt.push_str(
        "CRITICAL: You MUST generate EXACTLY 7 days (day 1 through day 7). No more, no less.\n\n",
    );
    prompt.push_str("Requirements for each day:\n");
    prompt.push_str("- Beginner-friendly explanations\n");
    prompt.push_str(&format!("- Tasks that fit within {time}\n"));
    prompt.push_str("- Actionable exercises\n\n");

    prompt.push_str("Output MUST be valid JSON with this EXACT structure:\n");
    prompt.push_str("{\n  \"plan\": [\n");
    let days: Vec<String> = (1..=7)
        .map(|day| {
            format!(
                "    {{\n      \"day\": {day},\n      \"title\": \"Day {day} Title\",\n      \
                 \"what_to_learn\": \"Brief explanation of the concept\",\n      \
                 \"what_to_do\": \"Specific actionable task\",\n      \
                 \"time_required\": \"{time}\"\n    }}"
            )
        })
        .collect();
    prompt.push_str(&days.join(",\n"));
    prompt.push_str("\n  ]\n}\n\n");

    prompt.push_str("Return ONLY the JSON. No explanations. ALL 7 days required.");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step1_lists_backgrounds() {
        let prompt = step1();
        assert!(prompt.contains(r#""question_id": "background""#));
        assert!(prompt.contains(r#"["Tech", "Product", "Design", "Non-tech"]"#));
        assert!(prompt.ends_with("Return JSON only."));
    }

    #[test]
    fn step2_selects_prompt_by_background() {
        assert!(step2("Tech").contains("technical role"));
        assert!(step2("Product").contains("product focus"));
        assert!(step2("Design").contains("design discipline"));
        assert!(step2("Non-tech").contains("why they want to learn AI"));
    }

    #[test]
    fn step2_unknown_background_falls_back_to_non_tech() {
        let fallback = step2("Non-tech");
        assert_eq!(step2("Marketing"), fallback);
        assert_eq!(step2(""), fallback);
        // Matching is exact, so casing differences also fall back.
        assert_eq!(step2("tech"), fallback);
    }

    #[test]
    fn background_from_answer() {
        assert_eq!(Background::from_answer("Design"), Background::Design);
        assert_eq!(Background::from_answer("Sales"), Background::NonTech);
    }

    #[test]
    fn step3_lists_time_options() {
        let prompt = step3();
        assert!(prompt.contains(r#""question_id": "time_commitment""#));
        assert!(prompt.contains(r#"["5 minutes", "10 minutes", "20 minutes"]"#));
    }

    #[test]
    fn step4_embeds_answers() {
        let prompt = step4("Tech", "Frontend", "10 minutes");
        assert!(prompt.contains("- Background: Tech\n"));
        assert!(prompt.contains("- Focus/Goal: Frontend\n"));
        assert!(prompt.contains("- Time per day: 10 minutes\n"));
        assert!(prompt.contains("- Tasks that fit within 10 minutes\n"));
    }

    #[test]
    fn step4_demands_exactly_seven_days() {
        let prompt = step4("Tech", "Frontend", "10 minutes");
        assert!(prompt.contains("EXACTLY 7 days (day 1 through day 7)"));
        assert!(prompt.contains("ALL 7 days required."));
        for day in 1..=7 {
            assert!(prompt.contains(&format!("\"day\": {day},")), "missing day {day}");
        }
        assert!(!prompt.contains("\"day\": 8"));
    }

    #[test]
    fn step4_repeats_time_in_every_slot() {
        let prompt = step4("Tech", "Frontend", "10 minutes");
        assert_eq!(
            prompt.matches(r#""time_required": "10 minutes""#).count(),
            7
        );
    }

    #[test]
    fn step4_example_structure_is_valid_json() {
        let prompt = step4("Design", "UI/UX", "20 minutes");
        let start = prompt.find("{\n  \"plan\"").unwrap();
        let end = prompt.rfind('}').unwrap();
        let value: serde_json::Value = serde_json::from_str(&prompt[start..=end]).unwrap();
        assert_eq!(value["plan"].as_array().unwrap().len(), 7);
        assert_eq!(value["plan"][6]["time_required"], "20 minutes");
    }

    #[test]
    fn system_prompt_demands_json_only() {
        assert!(SYSTEM_PROMPT.contains("Output ONLY valid JSON"));
        assert!(SYSTEM_PROMPT.contains("do NOT engage in conversation"));
    }
}
