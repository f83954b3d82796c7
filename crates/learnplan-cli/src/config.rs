//! Configuration file management for learnplan.
//!
//! Provides a TOML config file at `~/.config/learnplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use learnplan_core::OllamaConfig;

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub ollama: OllamaSection,
    pub server: ServerSection,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaSection {
    pub url: String,
    pub model: String,
    pub num_predict: u32,
    /// Whole-request timeout for generation calls. Unset means no timeout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for OllamaSection {
    fn default() -> Self {
        Self {
            url: OllamaConfig::DEFAULT_URL.to_string(),
            model: OllamaConfig::DEFAULT_MODEL.to_string(),
            num_predict: OllamaConfig::DEFAULT_NUM_PREDICT,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    pub port: u16,
    /// Origins allowed by CORS. A single `"*"` allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: [
                "http://localhost:3000",
                "http://127.0.0.1:3000",
                "http://localhost:5173",
                "http://127.0.0.1:5173",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the learnplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/learnplan` or `~/.config/learnplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("learnplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("learnplan")
}

/// Return the path to the learnplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file, or `None` if there is no file.
///
/// A file that exists but does not parse is an error.
pub fn load_config() -> Result<Option<ConfigFile>> {
    let path = config_path();
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file at {}", path.display()))?;
    Ok(Some(config))
}

/// Serialize and write the config file, creating parent dirs as needed.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    Ok(path)
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub ollama_url: Option<String>,
    pub model: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
}

/// Fully resolved configuration, fixed for the life of the process.
#[derive(Debug, Clone)]
pub struct LearnplanConfig {
    pub ollama: OllamaConfig,
    pub server: ServerSection,
}

impl LearnplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - Ollama URL: `--ollama-url` > `LEARNPLAN_OLLAMA_URL` > `ollama.url` > `OllamaConfig::DEFAULT_URL`
    /// - Model: `--model` > `LEARNPLAN_MODEL` > `ollama.model` > `OllamaConfig::DEFAULT_MODEL`
    /// - Bind/port: `--bind`/`--port` > `server.bind`/`server.port` > `0.0.0.0:8000`
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        let file = load_config()?.unwrap_or_default();

        let mut ollama = OllamaConfig::from_env_or(file.ollama.url, file.ollama.model)
            .with_num_predict(file.ollama.num_predict);
        if let Some(url) = &overrides.ollama_url {
            ollama.base_url = url.clone();
        }
        if let Some(model) = &overrides.model {
            ollama.model = model.clone();
        }
        if let Some(secs) = file.ollama.timeout_secs {
            ollama = ollama.with_timeout(Duration::from_secs(secs));
        }

        let mut server = file.server;
        if let Some(bind) = &overrides.bind {
            server.bind = bind.clone();
        }
        if let Some(port) = overrides.port {
            server.port = port;
        }

        Ok(Self { ollama, server })
    }
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
