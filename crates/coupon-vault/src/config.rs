//! Configuration management for Coupon Vault.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

use coupon_common::Locale;
use coupon_common::constants::{
    DEFAULT_LISTEN_ADDR, DEFAULT_MAX_ISSUE_ATTEMPTS, DEFAULT_REDIS_URL,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Secret mixed into every passcode hash
    #[serde(default)]
    pub salt: Salt,

    /// Language of user-facing messages
    #[serde(default)]
    pub locale: Locale,

    /// Store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Issuance configuration
    #[serde(default)]
    pub issue: IssueConfig,
}

/// Server-side hashing secret. Loaded once at startup and never mutated.
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Salt(String);

impl Salt {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Salt(<redacted>)")
    }
}

/// Which store backend to run against
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Redis,
    /// Process-local map, for development only
    Memory,
}

/// Store-specific configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Prepended to every serial number to form the store key
    #[serde(default)]
    pub key_prefix: String,
}

/// Issuance configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IssueConfig {
    /// Serial number candidates to try before giving up on a collision streak
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for IssueConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

// Default value functions
fn default_redis_url() -> String { DEFAULT_REDIS_URL.to_string() }
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_max_attempts() -> u32 { DEFAULT_MAX_ISSUE_ATTEMPTS }

impl AppConfig {
    /// Load configuration from file and `COUPON_*` environment, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut builder = config::Config::builder();
        if Path::new(config_path).exists() {
            builder = builder.add_source(config::File::with_name(config_path));
        } else {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
        }

        let mut config: Self = builder
            .add_source(
                config::Environment::with_prefix("COUPON")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to load config")?
            .try_deserialize()
            .context("Failed to parse config")?;

        // Apply CLI overrides
        if let Some(ref redis_url) = args.redis_url {
            config.redis_url = redis_url.clone();
        }
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(ref salt) = args.salt {
            config.salt = Salt::new(salt.clone());
        }
        if let Some(locale) = args.locale {
            config.locale = locale;
        }
        if let Some(backend) = args.store {
            config.store.backend = backend;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the service cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.salt.is_empty() {
            bail!("A non-empty salt is required (set SALT or --salt)");
        }
        if self.issue.max_attempts == 0 {
            bail!("issue.max_attempts must be at least 1");
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            listen_addr: default_listen_addr(),
            salt: Salt::default(),
            locale: Locale::default(),
            store: StoreConfig::default(),
            issue: IssueConfig::default(),
        }
    }
}
