//! Client configuration and environment lookup.

use anyhow::{Context, Result};
use std::env as std_env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://a.klaviyo.com/api";

/// API revision pinned on every request unless overridden.
pub const DEFAULT_REVISION: &str = "2024-10-15";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 500;

pub const ENV_API_KEY: &str = "KLAVIYO_API_KEY";
pub const ENV_API_URL: &str = "KLAVIYO_API_URL";
pub const ENV_REVISION: &str = "KLAVIYO_REVISION";
pub const ENV_MAX_RETRIES: &str = "KLAVIYO_MAX_RETRIES";
pub const ENV_RETRY_INTERVAL_MS: &str = "KLAVIYO_RETRY_INTERVAL_MS";

/// Source of environment variables, injectable for tests.
#[cfg_attr(test, mockall::automock)]
pub trait Environment: Send + Sync {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
}

/// Reads from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        std_env::var(key)
    }
}

/// Fixed-interval retry policy.
///
/// `max_attempts` counts the first attempt, so `1` disables retrying.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    max_attempts: u32,
    interval: Duration,
}

impl RetryConfig {
    /// Creates a policy. A `max_attempts` of zero is raised to one.
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
        }
    }

    /// A policy that performs a single attempt.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_MAX_ATTEMPTS,
            Duration::from_millis(DEFAULT_RETRY_INTERVAL_MS),
        )
    }
}

/// Everything needed to construct a [`crate::Client`].
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub revision: String,
    pub retry: RetryConfig,
    /// Per-attempt request timeout. `None` leaves it to the transport.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            revision: DEFAULT_REVISION.to_string(),
            retry: RetryConfig::default(),
            timeout: None,
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("revision", &self.revision)
            .field("retry", &self.retry)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(api_key.into()),
            ..Self::default()
        }
    }

    /// Builds a configuration from `KLAVIYO_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env(env: &impl Environment) -> Result<Self> {
        let mut config = Self::default();

        if let Ok(key) = env.env_var(ENV_API_KEY) {
            config.api_key = Some(key);
        }
        if let Ok(url) = env.env_var(ENV_API_URL) {
            config.base_url = url;
        }
        if let Ok(revision) = env.env_var(ENV_REVISION) {
            config.revision = revision;
        }

        let mut max_attempts = config.retry.max_attempts();
        let mut interval = config.retry.interval();
        if let Ok(value) = env.env_var(ENV_MAX_RETRIES) {
            max_attempts = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", ENV_MAX_RETRIES, value))?;
        }
        if let Ok(value) = env.env_var(ENV_RETRY_INTERVAL_MS) {
            let ms: u64 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid {}: {:?}", ENV_RETRY_INTERVAL_MS, value))?;
            interval = Duration::from_millis(ms);
        }
        config.retry = RetryConfig::new(max_attempts, interval);

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
