//! `learnplan doctor`: verify the local Ollama setup.

use std::io::Write;

use anyhow::Result;

use learnplan_core::llm::ModelInfo;
use learnplan_core::{Generator, OllamaClient};

const PROBE_PROMPT: &str = "Say only the word 'hello' and nothing else.";

/// Outcome of one diagnostic check.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
}

/// Run every check, writing a report to `out`. Returns the per-check results.
pub async fn run_doctor(client: &OllamaClient, out: &mut impl Write) -> Result<Vec<Check>> {
    let config = client.config();
    writeln!(out, "Ollama URL: {}", config.base_url)?;
    writeln!(out, "Model:      {}", config.model)?;

    let mut checks = Vec::new();

    section(out, "TEST 1: Ollama Connection")?;
    let connected = match client.version().await {
        Ok(version) => {
            writeln!(out, "OK   Ollama is running (version: {version})")?;
            true
        }
        Err(err) if err.is_unreachable() => {
            writeln!(out, "FAIL Could not connect to Ollama")?;
            writeln!(out)?;
            writeln!(out, "Quick fix:")?;
            writeln!(out, "  1. Install Ollama: https://ollama.com")?;
            writeln!(out, "  2. Start Ollama: ollama serve")?;
            false
        }
        Err(err) => {
            writeln!(out, "FAIL {err}")?;
            false
        }
    };
    checks.push(Check {
        name: "Ollama Connection",
        passed: connected,
    });

    // Later checks would only repeat the connection failure.
    if connected {
        section(out, "TEST 2: Model Availability")?;
        let models_ok = check_models(client, out).await?;
        checks.push(Check {
            name: "Model Availability",
            passed: models_ok,
        });

        section(out, "TEST 3: Simple Generation")?;
        let generation_ok = match client.generate(PROBE_PROMPT, None, 0.0).await {
            Ok(text) => {
                writeln!(out, "OK   Model replied: {}", text.trim())?;
                true
            }
            Err(err) => {
                writeln!(out, "FAIL {err}")?;
                false
            }
        };
        checks.push(Check {
            name: "Simple Generation",
            passed: generation_ok,
        });
    }

    section(out, "SUMMARY")?;
    for check in &checks {
        let mark = if check.passed { "PASS" } else { "FAIL" };
        writeln!(out, "{mark} {}", check.name)?;
    }
    let passed = checks.iter().filter(|c| c.passed).count();
    writeln!(out)?;
    writeln!(out, "{passed}/{} checks passed", checks.len())?;

    Ok(checks)
}

async fn check_models(client: &OllamaClient, out: &mut impl Write) -> Result<bool> {
    let models = match client.list_models().await {
        Ok(models) => models,
        Err(err) => {
            writeln!(out, "FAIL Could not list models: {err}")?;
            return Ok(false);
        }
    };

    if models.is_empty() {
        writeln!(out, "FAIL No models installed")?;
        writeln!(out, "     Install one: ollama pull {}", client.config().model)?;
        return Ok(false);
    }

    writeln!(out, "OK   Available models:")?;
    for model in &models {
        writeln!(out, "     - {} ({})", model.name, format_size(model.size))?;
    }

    let wanted = &client.config().model;
    if model_installed(&models, wanted) {
        writeln!(out, "OK   Configured model ({wanted}) is installed")?;
    } else {
        writeln!(out, "WARN Configured model ({wanted}) not found")?;
        writeln!(out, "     Install it: ollama pull {wanted}")?;
    }
    Ok(true)
}

fn section(out: &mut impl Write, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "=".repeat(60))?;
    Ok(())
}

/// Whether `wanted` matches an installed model, with or without a tag.
pub fn model_installed(models: &[ModelInfo], wanted: &str) -> bool {
    models.iter().any(|m| {
        m.name == wanted
            || m.name
                .strip_prefix(wanted)
                .is_some_and(|rest| rest.starts_with(':'))
    })
}

/// Human-readable size in GiB with one decimal place.
pub fn format_size(bytes: u64) -> String {
    format!("{:.1} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
}
