//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.folio/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! Everything is read once at startup.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::inference::providers::openrouter::DEFAULT_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub system_prompt_file: Option<String>,
    pub welcome_message: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
pub const DEFAULT_WELCOME_MESSAGE: &str = "👋 Welcome to my AI Portfolio chat! Ask me anything.";

// ============================================================================
// Environment
// ============================================================================

/// Snapshot of the environment variables the resolver reads.
///
/// Captured once so resolution is a pure function of its inputs.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let read = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            api_key: read("OPENROUTER_API_KEY"),
            model: read("OPENROUTER_MODEL"),
            base_url: read("OPENROUTER_BASE_URL"),
        }
    }
}

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub model_name: String,
    /// Hidden instruction turn; `None` means the conversation has no system turn.
    pub system_prompt: Option<String>,
    /// Seed assistant turn; `None` means the transcript starts empty.
    pub welcome_message: Option<String>,
    /// Not validated. A missing key surfaces as an authorization error turn.
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns the `~/.folio` directory.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".folio"))
}

/// Returns the path to `~/.folio/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Directory a relative `system_prompt_file` is read from: the parent of an
/// explicit `--config` file, else `~/.folio`.
pub fn config_base_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => path.parent().map(Path::to_path_buf),
        None => config_dir(),
    }
}

/// Load config from `path`, or from `~/.folio/config.toml` when `None`.
///
/// A missing default file is generated (commented out) and treated as empty.
/// A missing explicit file is an error. A malformed file is `ConfigError::Parse`.
pub fn load_config(path: Option<&Path>) -> Result<FolioConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_path() {
            Some(p) => {
                if !p.exists() {
                    info!("No config file found, generating default at {}", p.display());
                    generate_default_config(&p);
                    return Ok(FolioConfig::default());
                }
                p
            }
            None => {
                warn!("Could not determine home directory, using default config");
                return Ok(FolioConfig::default());
            }
        },
    };

    let contents = fs::read_to_string(&path)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse TOML text into a sparse config.
pub fn parse_config(contents: &str) -> Result<FolioConfig, ConfigError> {
    let config: FolioConfig = toml::from_str(contents)?;
    // api_key is deliberately left out of the log line.
    debug!(
        "Config: model={:?}, system_prompt_set={}, base_url={:?}",
        config.general.model,
        config.general.system_prompt.is_some() || config.general.system_prompt_file.is_some(),
        config.openrouter.base_url
    );
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# Folio Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# model = "openai/gpt-3.5-turbo"     # Or set OPENROUTER_MODEL
# system_prompt = "You answer questions about my portfolio."
# system_prompt_file = "system.md"   # Path relative to ~/.folio/
# welcome_message = "👋 Welcome to my AI Portfolio chat! Ask me anything."

# [openrouter]
# api_key = "sk-or-..."              # Or set OPENROUTER_API_KEY
# base_url = "https://openrouter.ai/api/v1"
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_model` is the `--model` flag (None = not specified). `base_dir` is
/// where a relative `system_prompt_file` lives, see [`config_base_dir`].
pub fn resolve(
    config: &FolioConfig,
    env: &EnvOverrides,
    cli_model: Option<&str>,
    base_dir: Option<&Path>,
) -> ResolvedConfig {
    // Model: CLI → env → config → default
    let model_name = cli_model
        .map(str::to_string)
        .or_else(|| env.model.clone())
        .or_else(|| config.general.model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // API key: env → config
    let openrouter_api_key = env
        .api_key
        .clone()
        .or_else(|| config.openrouter.api_key.clone());

    // Base URL: env → config → default
    let openrouter_base_url = env
        .base_url
        .clone()
        .or_else(|| config.openrouter.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let welcome_message = match config.general.welcome_message.as_deref() {
        Some(text) if text.trim().is_empty() => None,
        Some(text) => Some(text.to_string()),
        None => Some(DEFAULT_WELCOME_MESSAGE.to_string()),
    };

    ResolvedConfig {
        model_name,
        system_prompt: resolve_system_prompt(config, base_dir),
        welcome_message,
        openrouter_api_key,
        openrouter_base_url,
    }
}

/// Resolves the system prompt: inline wins over file. No default prompt.
fn resolve_system_prompt(config: &FolioConfig, base_dir: Option<&Path>) -> Option<String> {
    if let Some(prompt) = config.general.system_prompt.as_deref() {
        return Some(prompt.trim().to_string()).filter(|p| !p.is_empty());
    }

    let file = config.general.system_prompt_file.as_deref()?;
    let prompt_path = match base_dir {
        Some(dir) => dir.join(file),
        None => PathBuf::from(file),
    };
    match fs::read_to_string(&prompt_path) {
        Ok(contents) => {
            let trimmed = contents.trim().to_string();
            if trimmed.is_empty() {
                warn!("System prompt file is empty: {}", prompt_path.display());
                return None;
            }
            info!("Loaded system prompt from {}", prompt_path.display());
            Some(trimmed)
        }
        Err(e) => {
            warn!(
                "Failed to read system prompt file {}: {}",
                prompt_path.display(),
                e
            );
            None
        }
    }
}
