//! Configuration management for Lovechat
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{LovechatError, Result};
use crate::models::SubscriptionTier;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Lovechat
///
/// This structure holds all configuration needed for the pipeline,
/// including provider settings, chat behavior, and subscription plans.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Generative provider configuration
    pub provider: ProviderConfig,

    /// Chat pipeline behavior configuration
    #[serde(default)]
    pub chat: ChatConfig,

    /// Subscription plan configuration (daily quotas per tier)
    #[serde(default)]
    pub plans: PlansConfig,
}

/// Provider configuration
///
/// Specifies which generative provider to use and its settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Type of provider to use
    #[serde(rename = "type")]
    pub provider_type: String,

    /// OpenAI-compatible endpoint configuration
    #[serde(default)]
    pub openai: OpenAiConfig,
}

/// OpenAI-compatible provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Optional API base URL (useful for tests and local mocks)
    ///
    /// When set, this base is used to build the chat completions endpoint,
    /// which allows tests to point the provider at a mock server.
    #[serde(default)]
    pub api_base: Option<String>,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Model used for ordinary messages
    #[serde(default = "default_model")]
    pub model: String,

    /// Model used for complex messages (see the resolver's selection hook)
    #[serde(default = "default_capable_model")]
    pub capable_model: String,

    /// Per-call request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub timeout_seconds: u64,
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_capable_model() -> String {
    "gpt-4".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            api_key_env: default_api_key_env(),
            model: default_model(),
            capable_model: default_capable_model(),
            timeout_seconds: default_request_timeout(),
        }
    }
}

/// Chat pipeline behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Number of prior conversation turns included in the prompt
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,

    /// Response cache time-to-live (seconds)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_seconds: u64,

    /// Maximum entries held by the in-memory response cache
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Cache backend: "memory" or "sqlite"
    #[serde(default = "default_cache_backend")]
    pub cache_backend: String,

    /// Whether canned quick-phrase responses are enabled
    #[serde(default = "default_quick_phrases")]
    pub quick_phrases: bool,
}

fn default_history_turns() -> usize {
    6
}

fn default_cache_ttl() -> u64 {
    3600
}

fn default_cache_capacity() -> usize {
    1024
}

fn default_cache_backend() -> String {
    "memory".to_string()
}

fn default_quick_phrases() -> bool {
    true
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            history_turns: default_history_turns(),
            cache_ttl_seconds: default_cache_ttl(),
            cache_capacity: default_cache_capacity(),
            cache_backend: default_cache_backend(),
            quick_phrases: default_quick_phrases(),
        }
    }
}

/// Subscription plan configuration
///
/// Daily message quotas per tier. `None` means unlimited. This table is
/// the single source of truth for the usage gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlansConfig {
    /// Daily messages for the free tier
    #[serde(default = "default_free_limit")]
    pub free_daily_messages: Option<u32>,

    /// Daily messages for the basic tier
    #[serde(default = "default_basic_limit")]
    pub basic_daily_messages: Option<u32>,

    /// Daily messages for the premium tier (None = unlimited)
    #[serde(default)]
    pub premium_daily_messages: Option<u32>,

    /// Daily messages for the elite tier (None = unlimited)
    #[serde(default)]
    pub elite_daily_messages: Option<u32>,
}

fn default_free_limit() -> Option<u32> {
    Some(15)
}

fn default_basic_limit() -> Option<u32> {
    Some(100)
}

impl Default for PlansConfig {
    fn default() -> Self {
        Self {
            free_daily_messages: default_free_limit(),
            basic_daily_messages: default_basic_limit(),
            premium_daily_messages: None,
            elite_daily_messages: None,
        }
    }
}

impl PlansConfig {
    /// Returns the daily message limit for a tier, `None` meaning unlimited
    pub fn daily_limit(&self, tier: SubscriptionTier) -> Option<u32> {
        match tier {
            SubscriptionTier::Free => self.free_daily_messages,
            SubscriptionTier::Basic => self.basic_daily_messages,
            SubscriptionTier::Premium => self.premium_daily_messages,
            SubscriptionTier::Elite => self.elite_daily_messages,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LovechatError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| LovechatError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(api_base) = std::env::var("LOVECHAT_API_BASE") {
            self.provider.openai.api_base = Some(api_base);
        }

        if let Ok(model) = std::env::var("LOVECHAT_MODEL") {
            self.provider.openai.model = model;
        }

        if let Ok(ttl) = std::env::var("LOVECHAT_CACHE_TTL_SECONDS") {
            if let Ok(value) = ttl.parse() {
                self.chat.cache_ttl_seconds = value;
            } else {
                tracing::warn!("Invalid LOVECHAT_CACHE_TTL_SECONDS: {}", ttl);
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_base) = &cli.api_base {
            self.provider.openai.api_base = Some(api_base.clone());
        }

        if let Some(model) = &cli.model {
            self.provider.openai.model = model.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `LovechatError::Config` when a setting is out of range or
    /// references an unknown backend.
    pub fn validate(&self) -> Result<()> {
        if self.provider.provider_type != "openai" {
            return Err(LovechatError::Config(format!(
                "Unknown provider type: {}",
                self.provider.provider_type
            ))
            .into());
        }

        if self.chat.history_turns == 0 {
            return Err(
                LovechatError::Config("chat.history_turns must be at least 1".to_string()).into(),
            );
        }

        if self.chat.cache_ttl_seconds == 0 {
            return Err(LovechatError::Config(
                "chat.cache_ttl_seconds must be positive".to_string(),
            )
            .into());
        }

        match self.chat.cache_backend.as_str() {
            "memory" | "sqlite" => {}
            other => {
                return Err(
                    LovechatError::Config(format!("Unknown cache backend: {}", other)).into(),
                );
            }
        }

        if self.provider.openai.timeout_seconds == 0 {
            return Err(LovechatError::Config(
                "provider.openai.timeout_seconds must be positive".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                provider_type: "openai".to_string(),
                openai: OpenAiConfig::default(),
            },
            chat: ChatConfig::default(),
            plans: PlansConfig::default(),
        }
    }
}
