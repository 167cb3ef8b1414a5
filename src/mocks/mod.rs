//! Mock implementations for testing.
//!
//! Provides a mock transport, a mock auth provider and message fixtures for
//! unit testing without making real API calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::auth::AuthProvider;
use crate::errors::MailosaurError;
use crate::transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError};

/// Locks a mutex, recovering the data if a previous holder panicked.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Mock HTTP transport for testing.
pub struct MockTransport {
    responses: Mutex<Vec<MockOutcome>>,
    requests: Mutex<Vec<RecordedRequest>>,
    default_response: Mutex<Option<MockResponse>>,
}

enum MockOutcome {
    Response(MockResponse),
    Failure(TransportError),
}

/// A recorded request.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Request path.
    pub path: String,
    /// Query parameters.
    pub query: Vec<(String, String)>,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Request headers.
    pub headers: HashMap<String, String>,
}

impl RecordedRequest {
    /// Returns the value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses the body as JSON.
    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_ref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

/// A mock response.
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body.
    pub body: Vec<u8>,
}

impl MockResponse {
    /// Creates a successful JSON response.
    pub fn json<T: serde::Serialize>(value: &T) -> Self {
        let body = serde_json::to_vec(value).unwrap_or_default();
        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        Self {
            status: 200,
            headers,
            body,
        }
    }

    /// Creates an HTTP 204 response.
    pub fn no_content() -> Self {
        Self::empty(204)
    }

    /// Creates a response with an empty body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    /// Creates a response with custom status.
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            default_response: Mutex::new(None),
        }
    }

    /// Queues a response.
    pub fn queue(&self, response: MockResponse) {
        lock(&self.responses).push(MockOutcome::Response(response));
    }

    /// Queues a JSON response.
    pub fn queue_json<T: serde::Serialize>(&self, value: &T) {
        self.queue(MockResponse::json(value));
    }

    /// Queues a transport failure.
    pub fn queue_failure(&self, error: TransportError) {
        lock(&self.responses).push(MockOutcome::Failure(error));
    }

    /// Sets the response used once the queue is empty.
    pub fn set_default(&self, response: MockResponse) {
        *lock(&self.default_response) = Some(response);
    }

    /// Gets all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// Gets the last recorded request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Clears recorded requests.
    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    /// Returns the number of requests made.
    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    fn next_outcome(&self) -> MockOutcome {
        let mut responses = lock(&self.responses);
        if responses.is_empty() {
            MockOutcome::Response(
                lock(&self.default_response)
                    .clone()
                    .unwrap_or_else(|| MockResponse::empty(500)),
            )
        } else {
            responses.remove(0)
        }
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method: request.method,
            path: request.path,
            query: request.query,
            body: request.body,
            headers: request.headers,
        });

        match self.next_outcome() {
            MockOutcome::Response(response) => Ok(HttpResponse {
                status: response.status,
                headers: response.headers,
                body: response.body,
            }),
            MockOutcome::Failure(error) => Err(error),
        }
    }
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("request_count", &self.request_count())
            .finish()
    }
}

/// Mock auth provider for testing.
pub struct MockAuth {
    api_key: String,
}

impl MockAuth {
    /// Creates a new mock auth provider.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
        }
    }
}

impl Default for MockAuth {
    fn default() -> Self {
        Self::new("mock_test_key")
    }
}

impl AuthProvider for MockAuth {
    fn apply_auth(&self, headers: &mut HashMap<String, String>) {
        headers.insert(
            "Authorization".to_string(),
            format!("Basic {}", self.api_key),
        );
    }

    fn scheme(&self) -> &str {
        "Basic"
    }

    fn validate(&self) -> Result<(), MailosaurError> {
        Ok(())
    }
}

impl std::fmt::Debug for MockAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockAuth").finish()
    }
}

/// Test fixtures for common response types.
pub mod fixtures {
    use crate::types::messages::{
        Attachment, Link, Message, MessageAddress, MessageContent, MessageListResult,
        MessageSummary,
    };

    /// Creates a message with the given subject and otherwise typical content.
    pub fn message(subject: &str) -> Message {
        Message {
            id: "msg-1".to_string(),
            message_type: Some("Email".to_string()),
            sender: vec![MessageAddress::new("Support", "support@example.com")],
            to: vec![MessageAddress::new("Test User", "user@abcd1234.mailosaur.net")],
            subject: subject.to_string(),
            html: MessageContent {
                links: vec![
                    Link::new("https://example.com/activate", "Activate account"),
                    Link::new("https://example.com/help", "Help"),
                    Link::new("https://example.com/unsubscribe", "Unsubscribe"),
                ],
                body: "<p>Hello World</p>".to_string(),
                ..Default::default()
            },
            text: MessageContent {
                links: vec![
                    Link::new("https://example.com/activate", "https://example.com/activate"),
                    Link::new("https://example.com/help", "https://example.com/help"),
                ],
                body: "Hello World".to_string(),
                ..Default::default()
            },
            attachments: vec![Attachment {
                id: "att-1".to_string(),
                content_type: Some("application/pdf".to_string()),
                file_name: Some("invoice.pdf".to_string()),
                length: 2048,
                ..Default::default()
            }],
            server: Some("abcd1234".to_string()),
            ..Default::default()
        }
    }

    /// Creates a list result containing summaries with the given IDs.
    pub fn list_result(ids: &[&str]) -> MessageListResult {
        MessageListResult {
            items: ids
                .iter()
                .map(|id| MessageSummary {
                    id: (*id).to_string(),
                    message_type: Some("Email".to_string()),
                    server: Some("abcd1234".to_string()),
                    ..Default::default()
                })
                .collect(),
        }
    }
}
