use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use lr_agents::{AgentOptions, DEFAULT_MODEL_ID};
use lr_tools::{ContactOutConfig, API_TOKEN_ENV, DEFAULT_BASE_URL};

/// Layered configuration: defaults, then `~/.config/lr/config.toml`, then
/// `CONTACTOUT_API_TOKEN` and `LR_*` environment variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub contactout: ContactOutSection,

    #[serde(default)]
    pub agent: AgentSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactOutSection {
    /// API secret (prefer the CONTACTOUT_API_TOKEN env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Whole-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ContactOutSection {
    fn default() -> Self {
        Self {
            api_token: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSection {
    /// Agent used when none is given on the command line
    #[serde(default = "default_agent")]
    pub default_agent: String,

    #[serde(default = "default_model_id")]
    pub model_id: String,

    /// Session store connection string handed to the agent runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_url: Option<String>,

    #[serde(default = "default_true")]
    pub debug_mode: bool,
}

fn default_agent() -> String {
    "linkedin_researcher".to_string()
}

fn default_model_id() -> String {
    DEFAULT_MODEL_ID.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            default_agent: default_agent(),
            model_id: default_model_id(),
            db_url: None,
            debug_mode: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = Self::figment(Self::config_path().ok()).extract()?;
        Ok(config)
    }

    /// Build the provider stack; a missing file is simply skipped.
    pub fn figment(config_file: Option<PathBuf>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment
            .merge(
                Env::raw()
                    .only(&[API_TOKEN_ENV])
                    .map(|_| "contactout.api_token".into()),
            )
            .merge(Env::prefixed("LR_").split("__"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("lr"))
    }

    pub fn contactout_config(&self) -> ContactOutConfig {
        ContactOutConfig::new(self.contactout.api_token.clone())
            .with_base_url(self.contactout.base_url.clone())
            .with_timeout(Duration::from_secs(self.contactout.timeout_secs))
    }

    pub fn agent_options(&self) -> AgentOptions {
        AgentOptions {
            model_id: self.agent.model_id.clone(),
            user_id: None,
            session_id: None,
            db_url: self.agent.db_url.clone(),
            debug_mode: self.agent.debug_mode,
        }
    }

    /// Copy that is safe to print.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.contactout.api_token.is_some() {
            config.contactout.api_token = Some("(configured)".to_string());
        }
        config
    }
}
