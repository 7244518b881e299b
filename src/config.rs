use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::engine::activity_source::SourceConfig;

/// Directory under the platform config dir that holds our files.
pub const APP_DIR: &str = "spontaneous_adventures";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;

#[derive(Debug, Parser)]
#[command(name = "spontaneous_adventures", version, about = "Improvisational challenges to break your routine")]
pub struct Cli {
    /// Chat-completions model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Chat-completions endpoint URL
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Sampling temperature
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Never call the API; only use canned activities
    #[arg(long)]
    pub offline: bool,

    /// Print one activity to stdout and exit without opening a window
    #[arg(long)]
    pub once: bool,

    /// Player count for --once; implies multiplayer
    #[arg(long, requires = "once")]
    pub players: Option<u8>,
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

// keep the credential out of logs
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl AppConfig {
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            api_key: self.api_key.clone().filter(|key| !key.trim().is_empty()),
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }

    /// Overlay environment values. `lookup` stands in for `std::env::var`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.api_key = Some(v);
        }
        if let Some(v) = lookup("SPONTANEOUS_MODEL") {
            self.model = v;
        }
        if let Some(v) = lookup("SPONTANEOUS_ENDPOINT") {
            self.endpoint = v;
        }
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = &cli.model {
            self.model = v.clone();
        }
        if let Some(v) = &cli.endpoint {
            self.endpoint = v.clone();
        }
        if let Some(v) = cli.temperature {
            self.temperature = v;
        }
        if cli.offline {
            self.api_key = None;
        }
    }
}

pub fn config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Defaults, then the config file, then the environment, then the flags.
pub fn load_config(cli: &Cli) -> AppConfig {
    let path = config_path();
    let mut config = match read_config_file(&path) {
        Ok(Some(config)) => config,
        Ok(None) => AppConfig::default(),
        Err(err) => {
            tracing::warn!("ignoring config file: {err:#}");
            AppConfig::default()
        }
    };

    config.apply_env(|key| std::env::var(key).ok());
    config.apply_cli(cli);
    config
}

fn read_config_file(path: &Path) -> anyhow::Result<Option<AppConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let config = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;

    Ok(Some(config))
}
