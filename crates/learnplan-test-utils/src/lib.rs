//! Shared test utilities for learnplan integration tests.
//!
//! Two kinds of stand-in for a real model:
//! - **In-process generators** ([`ScriptedGenerator`], [`UnreachableGenerator`])
//!   for driving the planner and the HTTP facade directly.
//! - **A fake Ollama server** ([`spawn_fake_ollama`]) listening on an
//!   ephemeral port, so the real [`OllamaClient`] is exercised over HTTP.
//!
//! [`OllamaClient`]: learnplan_core::OllamaClient

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use learnplan_core::{Generator, LlmError};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A valid step 1 reply.
pub fn background_question_json() -> Value {
    json!({
        "question_id": "background",
        "question_text": "What's your background?",
        "options": ["Tech", "Product", "Design", "Non-tech"]
    })
}

/// A valid step 2 reply for the Tech background.
pub fn tech_followup_json() -> Value {
    json!({
        "question_id": "tech_focus",
        "question_text": "What best describes your role?",
        "options": ["Backend", "Frontend", "Data", "Mobile", "DevOps", "Student"]
    })
}

/// A valid step 3 reply.
pub fn time_question_json() -> Value {
    json!({
        "question_id": "time_commitment",
        "question_text": "How much time can you spend daily?",
        "options": ["5 minutes", "10 minutes", "20 minutes"]
    })
}

/// A valid step 4 reply with entries in the given day order.
pub fn plan_json_with_days(days: &[i64], time: &str) -> Value {
    let plan: Vec<Value> = days
        .iter()
        .map(|day| {
            json!({
                "day": day,
                "title": format!("Day {day}: AI Fundamentals"),
                "what_to_learn": "Learn about the basics of AI and how it applies to your field.",
                "what_to_do": "Write down 3 examples of AI you've encountered today.",
                "time_required": time
            })
        })
        .collect();
    json!({ "plan": plan })
}

/// A valid step 4 reply for days 1 through 7.
pub fn plan_json(time: &str) -> Value {
    plan_json_with_days(&[1, 2, 3, 4, 5, 6, 7], time)
}

// ---------------------------------------------------------------------------
// In-process generators
// ---------------------------------------------------------------------------

/// A prompt as received by a [`ScriptedGenerator`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub prompt: String,
    pub system: Option<String>,
    pub temperature: f32,
}

/// Replies with queued texts in order, then repeats the last one.
/// Records every call.
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedGenerator {
    pub fn new<I, S>(replies: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().map(Into::into).collect()),
            last: Mutex::new(String::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// A generator that always replies with `value` serialized as JSON.
    pub fn always_json(value: &Value) -> Arc<Self> {
        Self::new([value.to_string()])
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    fn model(&self) -> &str {
        "scripted"
    }

    fn base_url(&self) -> &str {
        "memory://scripted"
    }

    async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        temperature: f32,
    ) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(RecordedCall {
            prompt: prompt.to_string(),
            system: system.map(str::to_string),
            temperature,
        });
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.replies.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }
}

/// Always fails as if nothing were listening.
///
/// Backed by a real refused connection so the error carries a genuine
/// `reqwest::Error`.
pub struct UnreachableGenerator {
    url: String,
}

impl UnreachableGenerator {
    pub async fn new() -> Arc<Self> {
        Arc::new(Self {
            url: closed_port_url().await,
        })
    }
}

#[async_trait]
impl Generator for UnreachableGenerator {
    fn model(&self) -> &str {
        "unreachable"
    }

    fn base_url(&self) -> &str {
        &self.url
    }

    async fn generate(
        &self,
        _prompt: &str,
        _system: Option<&str>,
        _temperature: f32,
    ) -> Result<String, LlmError> {
        let client = learnplan_core::OllamaClient::new(learnplan_core::OllamaConfig::new(
            self.url.clone(),
            "unreachable",
        ))?;
        client.generate("ping", None, 0.0).await
    }
}

/// A base URL on localhost where nothing is listening.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().expect("failed to read local addr");
    drop(listener);
    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Fake Ollama server
// ---------------------------------------------------------------------------

/// How the fake server answers `/api/generate`.
#[derive(Debug, Clone)]
pub enum FakeReply {
    /// 200 with `{"response": <text>}`.
    Text(String),
    /// 200 with a body lacking the `response` field.
    NoResponseField,
    /// The given status with a plain-text body.
    Status(u16, String),
}

#[derive(Clone)]
struct FakeState {
    reply: FakeReply,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// A running fake Ollama server.
pub struct FakeOllama {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<Value>>>,
    handle: tokio::task::JoinHandle<()>,
}

impl FakeOllama {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Bodies of every `/api/generate` request received so far.
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeOllama {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start a fake Ollama server on an ephemeral localhost port.
///
/// Serves `/api/generate` with `reply`, `/api/version` with `0.0.0-fake`,
/// and `/api/tags` listing `llama3.2:latest`.
pub async fn spawn_fake_ollama(reply: FakeReply) -> FakeOllama {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = FakeState {
        reply,
        requests: requests.clone(),
    };

    let app = Router::new()
        .route("/api/generate", post(fake_generate))
        .route("/api/version", get(fake_version))
        .route("/api/tags", get(fake_tags))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind fake ollama");
    let addr = listener.local_addr().expect("failed to read local addr");
    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("fake ollama server failed");
    });

    FakeOllama {
        addr,
        requests,
        handle,
    }
}

async fn fake_generate(
    State(state): State<FakeState>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.requests.lock().unwrap().push(body);
    match state.reply {
        FakeReply::Text(text) => (
            StatusCode::OK,
            json!({ "model": "llama3.2", "response": text, "done": true }).to_string(),
        ),
        FakeReply::NoResponseField => (StatusCode::OK, json!({ "done": true }).to_string()),
        FakeReply::Status(code, body) => (
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        ),
    }
}

async fn fake_version() -> Json<Value> {
    Json(json!({ "version": "0.0.0-fake" }))
}

async fn fake_tags() -> Json<Value> {
    Json(json!({
        "models": [{ "name": "llama3.2:latest", "size": 2019393189u64 }]
    }))
}
