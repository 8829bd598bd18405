//! Configuration management for the intake service.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use intake_common::constants::{
    DEFAULT_LISTEN_ADDR, DEFAULT_RECAPTCHA_TIMEOUT_SECS, DEFAULT_RECAPTCHA_VERIFY_URL,
    DEFAULT_REDIS_URL, DEFAULT_SUBMIT_PATH, redis_keys,
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

    /// Path the submission endpoint is mounted on
    #[serde(default = "default_submit_path")]
    pub submit_path: String,

    /// reCAPTCHA configuration
    #[serde(default)]
    pub recaptcha: RecaptchaConfig,

    /// Session lookup configuration
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Answer storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Error reporting configuration
    #[serde(default)]
    pub reporting: ReportingConfig,
}

/// reCAPTCHA siteverify configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RecaptchaConfig {
    /// Server-side secret shared with the verification service
    #[serde(default)]
    pub secret: String,

    /// Verification endpoint
    #[serde(default = "default_verify_url")]
    pub verify_url: String,

    /// HTTP client timeout in seconds
    #[serde(default = "default_recaptcha_timeout")]
    pub timeout_secs: u64,
}

impl Default for RecaptchaConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            verify_url: default_verify_url(),
            timeout_secs: default_recaptcha_timeout(),
        }
    }
}

/// Bearer token → user lookup configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Redis key prefix for session entries
    #[serde(default = "default_session_prefix")]
    pub session_prefix: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            session_prefix: default_session_prefix(),
        }
    }
}

/// Answer persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Redis key prefix for stored answers
    #[serde(default = "default_answer_prefix")]
    pub answer_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            answer_prefix: default_answer_prefix(),
        }
    }
}

/// Error reporting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportingConfig {
    /// Webhook receiving error reports (reports are only logged when unset)
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Environment tag attached to every report
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            environment: default_environment(),
        }
    }
}

// Default value functions
fn default_redis_url() -> String { DEFAULT_REDIS_URL.to_string() }
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_submit_path() -> String { DEFAULT_SUBMIT_PATH.to_string() }
fn default_verify_url() -> String { DEFAULT_RECAPTCHA_VERIFY_URL.to_string() }
fn default_recaptcha_timeout() -> u64 { DEFAULT_RECAPTCHA_TIMEOUT_SECS }
fn default_session_prefix() -> String { redis_keys::SESSION_PREFIX.to_string() }
fn default_answer_prefix() -> String { redis_keys::ANSWER_PREFIX.to_string() }
fn default_environment() -> String { "production".to_string() }

impl AppConfig {
    /// Load configuration from file, with CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // Apply CLI overrides
        if let Some(ref redis_url) = args.redis_url {
            config.redis_url = redis_url.clone();
        }
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(ref secret) = args.recaptcha_secret {
            config.recaptcha.secret = secret.clone();
        }
        if let Some(ref webhook) = args.error_webhook_url {
            config.reporting.webhook_url = Some(webhook.clone());
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.recaptcha.secret.trim().is_empty() {
            bail!("recaptcha.secret is not set (config file or RECAPTCHA_SECRET)");
        }
        if !self.submit_path.starts_with('/') {
            bail!("submit_path must start with '/', got {:?}", self.submit_path);
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            listen_addr: default_listen_addr(),
            submit_path: default_submit_path(),
            recaptcha: RecaptchaConfig::default(),
            identity: IdentityConfig::default(),
            storage: StorageConfig::default(),
            reporting: ReportingConfig::default(),
        }
    }
}
