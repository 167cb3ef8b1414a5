//! Configuration module for the Mailosaur client.
//!
//! Holds the API key, base URL, request timeout and the defaults used when
//! waiting for a message to arrive.

use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;

use crate::errors::{MailosaurError, MailosaurResult};

/// Default base URL for the Mailosaur API.
pub const DEFAULT_BASE_URL: &str = "https://mailosaur.com";

/// Default request timeout (60 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Default time to wait for a matching message (10 seconds).
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default look-back window for message searches (1 hour).
pub const DEFAULT_RECEIVED_WINDOW: Duration = Duration::from_secs(60 * 60);

/// Configuration for the Mailosaur client.
#[derive(Clone)]
pub struct MailosaurConfig {
    /// API key for authentication (stored securely).
    pub(crate) api_key: SecretString,
    /// Base URL for API requests.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// How long `get` waits for a matching message.
    pub wait_timeout: Duration,
    /// Only messages received within this window are searched by `get`.
    pub received_window: Duration,
}

impl MailosaurConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> MailosaurConfigBuilder {
        MailosaurConfigBuilder::new()
    }

    /// Creates a configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MAILOSAUR_API_KEY` (required): API key for authentication
    /// - `MAILOSAUR_BASE_URL` (optional): Custom base URL
    /// - `MAILOSAUR_TIMEOUT` (optional): Request timeout in seconds
    pub fn from_env() -> MailosaurResult<Self> {
        let mut builder = MailosaurConfigBuilder::new().api_key_from_env("MAILOSAUR_API_KEY")?;

        if let Ok(base_url) = std::env::var("MAILOSAUR_BASE_URL") {
            builder = builder.base_url(base_url);
        }

        if let Ok(timeout_str) = std::env::var("MAILOSAUR_TIMEOUT") {
            if let Ok(timeout_secs) = timeout_str.parse::<u64>() {
                builder = builder.timeout(Duration::from_secs(timeout_secs));
            }
        }

        builder.build()
    }

    /// Returns the API key (exposing the secret).
    pub(crate) fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Returns the API key hint (last 4 characters) for debugging.
    pub fn api_key_hint(&self) -> String {
        crate::auth::key_hint(self.api_key.expose_secret())
    }

    /// Returns the full URL for an endpoint.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for MailosaurConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailosaurConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("wait_timeout", &self.wait_timeout)
            .field("received_window", &self.received_window)
            .finish()
    }
}

/// Builder for `MailosaurConfig`.
#[derive(Default)]
pub struct MailosaurConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    wait_timeout: Option<Duration>,
    received_window: Option<Duration>,
}

impl MailosaurConfigBuilder {
    /// Creates a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the API key from an environment variable.
    pub fn api_key_from_env(mut self, var_name: &str) -> MailosaurResult<Self> {
        let api_key = std::env::var(var_name).map_err(|_| MailosaurError::Configuration {
            message: format!("Environment variable {} not set", var_name),
        })?;
        self.api_key = Some(api_key);
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the timeout in seconds.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Some(Duration::from_secs(secs));
        self
    }

    /// Sets how long `get` waits for a matching message.
    pub fn wait_timeout(mut self, wait_timeout: Duration) -> Self {
        self.wait_timeout = Some(wait_timeout);
        self
    }

    /// Sets the look-back window used by `get`.
    pub fn received_window(mut self, window: Duration) -> Self {
        self.received_window = Some(window);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> MailosaurResult<MailosaurConfig> {
        let api_key = self.api_key.ok_or_else(|| MailosaurError::Configuration {
            message: "API key is required".to_string(),
        })?;

        if api_key.trim().is_empty() {
            return Err(MailosaurError::Configuration {
                message: "API key cannot be empty".to_string(),
            });
        }

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let parsed = url::Url::parse(&base_url)?;
        if !matches!(parsed.scheme(), "https" | "http") {
            return Err(MailosaurError::Configuration {
                message: format!("Unsupported URL scheme: {}", parsed.scheme()),
            });
        }
        if parsed.scheme() == "http" {
            tracing::warn!(base_url = %base_url, "Base URL does not use HTTPS");
        }

        Ok(MailosaurConfig {
            api_key: SecretString::new(api_key),
            base_url,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            wait_timeout: self.wait_timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT),
            received_window: self.received_window.unwrap_or(DEFAULT_RECEIVED_WINDOW),
        })
    }
}
