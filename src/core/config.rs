//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.supportdesk/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::agents::{AgentDirectory, AgentEntry};
use crate::core::prompts::{QuickPrompt, default_prompts};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SupportConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub agents: Vec<AgentEntry>,
    #[serde(default)]
    pub prompts: Vec<QuickPrompt>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub base_url: Option<String>,
    pub chat_path: Option<String>,
    pub conversation_id: Option<String>,
    pub log_level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CHAT_PATH: &str = "/api/chat";
pub const DEFAULT_CONVERSATION_ID: &str = "demo-session";
pub const DEFAULT_LOG_LEVEL: &str = "debug";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub chat_path: String,
    pub conversation_id: String,
    pub log_level: String,
    pub agents: AgentDirectory,
    pub prompts: Vec<QuickPrompt>,
}

/// Values supplied on the command line (None = flag not given).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub conversation_id: Option<String>,
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

/// Returns the path to `~/.supportdesk/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".supportdesk").join("config.toml"))
}

/// Load config from `~/.supportdesk/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `SupportConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<SupportConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(SupportConfig::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<SupportConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(SupportConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: SupportConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# supportdesk configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# base_url = "http://localhost:8000"       # Or SUPPORTDESK_BASE_URL / --base-url
# chat_path = "/api/chat"                  # Or SUPPORTDESK_CHAT_PATH
# conversation_id = "demo-session"         # Or SUPPORTDESK_CONVERSATION_ID / --conversation-id
# log_level = "debug"                      # "error", "warn", "info", "debug", "trace"

# Extra agents (or new display names for the built-in ones)
# [[agents]]
# id = "billing"
# name = "Billing"
# description = "Checking invoices..."
# color = "yellow"                         # Color name or "#rrggbb"

# Landing prompts (replace the built-in set when present)
# [[prompts]]
# label = "Shipping"
# prompt = "How long does shipping take?"
"##;

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
pub fn resolve(config: &SupportConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| std::env::var("SUPPORTDESK_BASE_URL").ok())
        .or_else(|| config.general.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Chat path: env → config → default
    let chat_path = std::env::var("SUPPORTDESK_CHAT_PATH")
        .ok()
        .or_else(|| config.general.chat_path.clone())
        .unwrap_or_else(|| DEFAULT_CHAT_PATH.to_string());

    // Conversation id: CLI → env → config → default
    let conversation_id = cli
        .conversation_id
        .clone()
        .or_else(|| std::env::var("SUPPORTDESK_CONVERSATION_ID").ok())
        .or_else(|| config.general.conversation_id.clone())
        .unwrap_or_else(|| DEFAULT_CONVERSATION_ID.to_string());

    let log_level = config
        .general
        .log_level
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    // Configured prompts replace the built-in set wholesale
    let prompts = if config.prompts.is_empty() {
        default_prompts()
    } else {
        config.prompts.clone()
    };

    ResolvedConfig {
        base_url,
        chat_path,
        conversation_id,
        log_level,
        agents: AgentDirectory::with_entries(&config.agents),
        prompts,
    }
}

impl ResolvedConfig {
    /// Parsed log level, defaulting to Debug for unrecognized values.
    pub fn level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Debug)
    }
}
