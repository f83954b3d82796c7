mod config;
mod doctor_cmd;
mod serve_cmd;
mod walkthrough_cmd;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use learnplan_core::{OllamaClient, OllamaConfig, OnboardingPlanner};

use config::{LearnplanConfig, Overrides};

#[derive(Parser)]
#[command(
    name = "learnplan",
    about = "Onboarding questions and 7-day learning plans from a local Ollama model"
)]
struct Cli {
    /// Ollama base URL (overrides LEARNPLAN_OLLAMA_URL env var)
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Model name (overrides LEARNPLAN_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a learnplan config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the onboarding HTTP API
    Serve {
        /// Address to bind
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
    /// Check that Ollama is running and the model can generate
    Doctor,
    /// Run all four onboarding steps once and print the results
    Walkthrough {
        /// Answer to the background question
        #[arg(long, default_value = "Tech")]
        background: String,
        /// Answer to the follow-up question
        #[arg(long, default_value = "Frontend")]
        focus: String,
        /// Daily time commitment
        #[arg(long, default_value = "10 minutes")]
        time: String,
    },
}

/// Execute the `learnplan init` command: write the config file.
fn cmd_init(ollama_url: Option<&str>, model: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let mut cfg = config::ConfigFile::default();
    if let Some(url) = ollama_url {
        cfg.ollama.url = url.to_string();
    }
    if let Some(model) = model {
        cfg.ollama.model = model.to_string();
    }

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  ollama.url   = {}", cfg.ollama.url);
    println!("  ollama.model = {}", cfg.ollama.model);
    println!(
        "  server       = {}:{}",
        cfg.server.bind, cfg.server.port
    );
    println!();
    println!("Next: run `learnplan doctor` to check your Ollama setup.");

    Ok(())
}

fn client_for(ollama: &OllamaConfig) -> anyhow::Result<OllamaClient> {
    Ok(OllamaClient::new(ollama.clone())?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut overrides = Overrides {
        ollama_url: cli.ollama_url,
        model: cli.model,
        ..Overrides::default()
    };

    match cli.command {
        Commands::Init { force } => {
            cmd_init(
                overrides.ollama_url.as_deref(),
                overrides.model.as_deref(),
                force,
            )?;
        }
        Commands::Serve { bind, port } => {
            overrides.bind = bind;
            overrides.port = port;
            let resolved = LearnplanConfig::resolve(&overrides)?;
            serve_cmd::run_serve(&resolved).await?;
        }
        Commands::Doctor => {
            let resolved = LearnplanConfig::resolve(&overrides)?;
            let client = client_for(&resolved.ollama)?;
            let checks = doctor_cmd::run_doctor(&client, &mut std::io::stdout()).await?;
            if checks.iter().any(|c| !c.passed) {
                std::process::exit(1);
            }
        }
        Commands::Walkthrough {
            background,
            focus,
            time,
        } => {
            let resolved = LearnplanConfig::resolve(&overrides)?;
            let planner = OnboardingPlanner::new(Arc::new(client_for(&resolved.ollama)?));
            let answers = walkthrough_cmd::Answers {
                background,
                focus,
                time,
            };
            let result =
                walkthrough_cmd::run_walkthrough(&planner, &answers, &mut std::io::stdout()).await;
            if let Err(e) = result {
                eprintln!("{e:#}");
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
