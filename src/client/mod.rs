//! Mailosaur API client.
//!
//! Provides the main client interface for interacting with the Mailosaur API.

use std::sync::Arc;

use crate::auth::{ApiKeyAuth, AuthProvider};
use crate::config::{MailosaurConfig, MailosaurConfigBuilder};
use crate::errors::{MailosaurError, MailosaurResult};
use crate::services::MessagesService;
use crate::transport::{HttpTransport, HttpTransportImpl};

/// The main Mailosaur client.
///
/// # Example
///
/// ```rust,no_run
/// use mailosaur_keywords::{MailosaurClient, SearchCriteria};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = MailosaurClient::builder()
///         .api_key("your_api_key")
///         .build()?;
///
///     let criteria = SearchCriteria::new().sent_to("abcd1234.mailosaur.net");
///     let message = client.messages().get("abcd1234", &criteria).await?;
///     println!("{}", message.subject);
///     Ok(())
/// }
/// ```
pub struct MailosaurClient {
    config: MailosaurConfig,
    messages_service: MessagesService,
}

impl MailosaurClient {
    /// Creates a new client builder.
    pub fn builder() -> MailosaurClientBuilder {
        MailosaurClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// Reads `MAILOSAUR_API_KEY` and optionally `MAILOSAUR_BASE_URL` and
    /// `MAILOSAUR_TIMEOUT`.
    pub fn from_env() -> MailosaurResult<Self> {
        let config = MailosaurConfig::from_env()?;
        MailosaurClientBuilder::from_config(config).build()
    }

    /// Creates a client from an API key.
    pub fn from_api_key(api_key: impl Into<String>) -> MailosaurResult<Self> {
        MailosaurClientBuilder::new().api_key(api_key).build()
    }

    /// Returns the messages service.
    pub fn messages(&self) -> &MessagesService {
        &self.messages_service
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MailosaurConfig {
        &self.config
    }
}

impl std::fmt::Debug for MailosaurClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailosaurClient")
            .field("config", &self.config)
            .finish()
    }
}

/// Builder for the Mailosaur client.
pub struct MailosaurClientBuilder {
    config_builder: MailosaurConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl MailosaurClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self {
            config_builder: MailosaurConfigBuilder::new(),
            transport: None,
            auth: None,
        }
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: MailosaurConfig) -> Self {
        Self {
            config_builder: MailosaurConfigBuilder::new()
                .api_key(config.api_key())
                .base_url(&config.base_url)
                .timeout(config.timeout)
                .wait_timeout(config.wait_timeout)
                .received_window(config.received_window),
            transport: None,
            auth: None,
        }
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_key(api_key);
        self
    }

    /// Sets the API key from an environment variable.
    pub fn api_key_from_env(mut self, var_name: &str) -> MailosaurResult<Self> {
        self.config_builder = self.config_builder.api_key_from_env(var_name)?;
        Ok(self)
    }

    /// Sets the base URL.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets how long `get` waits for a matching message.
    pub fn wait_timeout(mut self, wait_timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.wait_timeout(wait_timeout);
        self
    }

    /// Sets the look-back window used by `get`.
    pub fn received_window(mut self, window: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.received_window(window);
        self
    }

    /// Sets a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth provider.
    pub fn auth(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the client.
    pub fn build(self) -> MailosaurResult<MailosaurClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                HttpTransportImpl::new(&config.base_url, config.timeout)
                    .map_err(|e| MailosaurError::configuration(e.to_string()))?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(a) => a,
            None => Arc::new(ApiKeyAuth::from_string(config.api_key())),
        };
        auth.validate()?;

        let messages_service = MessagesService::new(transport, auth, &config);

        tracing::debug!(
            base_url = %config.base_url,
            key_hint = %config.api_key_hint(),
            "Mailosaur client created"
        );

        Ok(MailosaurClient {
            config,
            messages_service,
        })
    }
}

impl Default for MailosaurClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
