//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.biblia/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use clap::ValueEnum;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Provider;
use crate::core::storage::default_state_path;
use crate::inference::providers::{lmstudio, openrouter};
use crate::scripture::model::DEFAULT_TRANSLATION;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BibliaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub openrouter: OpenRouterConfig,
    #[serde(default)]
    pub lmstudio: LmStudioConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub default_provider: Option<String>,
    pub default_model: Option<String>,
    pub translation: Option<String>,
    pub state_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct OpenRouterConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LmStudioConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";
const FALLBACK_STATE_FILE: &str = "biblia-state.json";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub provider: Provider,
    pub model_name: String,
    pub translation: String,
    pub state_file: PathBuf,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub lmstudio_base_url: String,
}

/// Values given on the command line. `None` means not specified.
#[derive(Debug, Default, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub provider: Option<&'a Provider>,
    pub model: Option<&'a str>,
    pub state_file: Option<&'a Path>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.biblia/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".biblia").join("config.toml"))
}

/// Load config from `~/.biblia/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `BibliaConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<BibliaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(BibliaConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<BibliaConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(BibliaConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: BibliaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    // Keep the API key out of the log.
    debug!(
        "Config: provider={:?}, model={:?}, translation={:?}, state_file={:?}",
        config.general.default_provider,
        config.general.default_model,
        config.general.translation,
        config.general.state_file
    );
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Biblia Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# default_provider = "openrouter"    # "openrouter" or "lmstudio"
# default_model = "google/gemini-2.5-flash"
# translation = "João Ferreira de Almeida"
# state_file = "/home/me/.biblia/state.json"

# [openrouter]
# api_key = "sk-or-..."              # Or set OPENROUTER_API_KEY env var
# base_url = "https://openrouter.ai/api/v1"

# [lmstudio]
# base_url = "http://localhost:1234/v1"
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &BibliaConfig, cli: CliOverrides<'_>) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn parse_provider(name: &str) -> Option<Provider> {
    match Provider::from_str(name, true) {
        Ok(p) => Some(p),
        Err(_) => {
            warn!("Unknown provider '{}', ignoring", name);
            None
        }
    }
}

/// Same as [`resolve`], reading environment variables through `env`.
pub fn resolve_with_env(
    config: &BibliaConfig,
    cli: CliOverrides<'_>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Provider: CLI → env → config → default
    let provider = cli
        .provider
        .cloned()
        .or_else(|| env("BIBLIA_PROVIDER").and_then(|s| parse_provider(&s)))
        .or_else(|| {
            config
                .general
                .default_provider
                .as_deref()
                .and_then(parse_provider)
        })
        .unwrap_or_default();

    // Model: CLI → env → config → default
    let model_name = cli
        .model
        .map(|s| s.to_string())
        .or_else(|| env("BIBLIA_MODEL"))
        .or_else(|| config.general.default_model.clone())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let translation = config
        .general
        .translation
        .clone()
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_TRANSLATION.to_string());

    // State file: CLI → config → ~/.biblia/state.json
    let state_file = cli
        .state_file
        .map(Path::to_path_buf)
        .or_else(|| config.general.state_file.as_ref().map(PathBuf::from))
        .or_else(default_state_path)
        .unwrap_or_else(|| PathBuf::from(FALLBACK_STATE_FILE));

    // OpenRouter API key: env → config. Blank counts as missing.
    let openrouter_api_key = env("OPENROUTER_API_KEY")
        .or_else(|| config.openrouter.api_key.clone())
        .filter(|k| !k.trim().is_empty());

    // OpenRouter base URL: env → config → default
    let openrouter_base_url = env("OPENROUTER_BASE_URL")
        .or_else(|| config.openrouter.base_url.clone())
        .unwrap_or_else(|| openrouter::DEFAULT_BASE_URL.to_string());

    // LM Studio base URL: env → config → default
    let lmstudio_base_url = env("LM_STUDIO_BASE_URL")
        .or_else(|| config.lmstudio.base_url.clone())
        .unwrap_or_else(|| lmstudio::DEFAULT_BASE_URL.to_string());

    ResolvedConfig {
        provider,
        model_name,
        translation,
        state_file,
        openrouter_api_key,
        openrouter_base_url,
        lmstudio_base_url,
    }
}
