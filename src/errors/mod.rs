//! Error types for the Mailosaur client and the keyword layer.
//!
//! Two taxonomies live here. [`MailosaurError`] covers everything that can go
//! wrong while talking to the Mailosaur API. [`KeywordError`] is what a keyword
//! returns: either an assertion mismatch or a client error passed through as-is.

use thiserror::Error;

/// Result type alias for Mailosaur client operations.
pub type MailosaurResult<T> = Result<T, MailosaurError>;

/// Result type alias for keyword operations.
pub type KeywordResult<T> = Result<T, KeywordError>;

/// Error type for Mailosaur client operations.
#[derive(Debug, Error)]
pub enum MailosaurError {
    /// Configuration error (missing API key, invalid base URL, etc.)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue.
        message: String,
    },

    /// The request had one or more invalid parameters (HTTP 400).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Error message, including per-field details when available.
        message: String,
    },

    /// Authentication failed (HTTP 401).
    #[error("Authentication failed: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// The API key lacks permission for the operation (HTTP 403).
    #[error("Permission denied: {message}")]
    Permission {
        /// Error message.
        message: String,
    },

    /// The requested resource does not exist (HTTP 404).
    #[error("Not found: {message}")]
    NotFound {
        /// Error message.
        message: String,
    },

    /// No matching message arrived before the wait timeout elapsed.
    #[error("Search timeout: {message}")]
    SearchTimeout {
        /// Error message.
        message: String,
    },

    /// Any other non-success API response.
    #[error("API error (HTTP {status_code}): {message}")]
    Api {
        /// Error message.
        message: String,
        /// HTTP status code.
        status_code: u16,
        /// Raw response body.
        body: Option<String>,
    },

    /// Network/connection error.
    #[error("Network error: {message}")]
    Network {
        /// Error message.
        message: String,
        /// Underlying cause.
        cause: Option<String>,
    },

    /// Request timeout.
    #[error("Request timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message.
        message: String,
    },
}

impl MailosaurError {
    /// Returns the Mailosaur error type identifier for this error.
    pub fn error_type(&self) -> &'static str {
        match self {
            MailosaurError::Configuration { .. } => "configuration_error",
            MailosaurError::InvalidRequest { .. } => "invalid_request",
            MailosaurError::Authentication { .. } => "authentication_error",
            MailosaurError::Permission { .. } => "permission_error",
            MailosaurError::NotFound { .. } => "not_found",
            MailosaurError::SearchTimeout { .. } => "search_timeout",
            MailosaurError::Api { .. } => "api_error",
            MailosaurError::Network { .. } => "network_error",
            MailosaurError::Timeout { .. } => "timeout",
            MailosaurError::Serialization { .. } => "serialization_error",
        }
    }

    /// Returns the HTTP status code associated with this error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MailosaurError::InvalidRequest { .. } => Some(400),
            MailosaurError::Authentication { .. } => Some(401),
            MailosaurError::Permission { .. } => Some(403),
            MailosaurError::NotFound { .. } => Some(404),
            MailosaurError::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }

    /// Creates an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        MailosaurError::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        MailosaurError::Configuration {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        MailosaurError::Network {
            message: message.into(),
            cause: None,
        }
    }
}

/// Validation error body returned by the API on HTTP 400.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorResponse {
    /// Per-field errors.
    #[serde(default)]
    pub errors: Vec<ApiFieldError>,
}

/// A validation error for a single request field.
#[derive(Debug, serde::Deserialize)]
pub struct ApiFieldError {
    /// The offending field.
    pub field: String,
    /// Error details for the field.
    #[serde(default)]
    pub detail: Vec<ApiErrorDetail>,
}

/// Detail entry of a field error.
#[derive(Debug, serde::Deserialize)]
pub struct ApiErrorDetail {
    /// Human readable description.
    pub description: String,
}

impl From<serde_json::Error> for MailosaurError {
    fn from(err: serde_json::Error) -> Self {
        MailosaurError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for MailosaurError {
    fn from(err: url::ParseError) -> Self {
        MailosaurError::Configuration {
            message: format!("Invalid URL: {}", err),
        }
    }
}

impl From<crate::transport::TransportError> for MailosaurError {
    fn from(err: crate::transport::TransportError) -> Self {
        use crate::transport::TransportError;
        match err {
            TransportError::Timeout { timeout } => MailosaurError::Timeout {
                message: format!("No response after {:?}", timeout),
            },
            TransportError::Connection { message } => MailosaurError::Network {
                message,
                cause: None,
            },
            other => MailosaurError::Network {
                message: other.to_string(),
                cause: None,
            },
        }
    }
}

/// Error returned by a keyword.
#[derive(Debug, Error)]
pub enum KeywordError {
    /// The retrieved message did not satisfy the expectation.
    #[error("{0}")]
    Assertion(String),

    /// An assertion failed without a descriptive message.
    #[error("AssertionError")]
    AssertionFailed,

    /// The client failed; the error is passed through unchanged.
    #[error(transparent)]
    Client(#[from] MailosaurError),

    /// No keyword with the given name exists in the library.
    #[error("No keyword with name '{name}' found.")]
    UnknownKeyword {
        /// The name that was looked up.
        name: String,
    },

    /// The retrieved message lacks a field the keyword reads.
    #[error("Message {message_id} has no {field}")]
    MissingField {
        /// ID of the message.
        message_id: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The keyword was called with the wrong number or type of arguments.
    #[error("Keyword '{keyword}' got invalid arguments: {message}")]
    InvalidArguments {
        /// Keyword name.
        keyword: String,
        /// What was wrong.
        message: String,
    },
}

impl KeywordError {
    /// Returns true if this error is an assertion failure.
    pub fn is_assertion(&self) -> bool {
        matches!(
            self,
            KeywordError::Assertion(_) | KeywordError::AssertionFailed
        )
    }

    /// Returns the underlying client error, if any.
    pub fn client_error(&self) -> Option<&MailosaurError> {
        match self {
            KeywordError::Client(err) => Some(err),
            _ => None,
        }
    }
}
