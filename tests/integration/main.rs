//! Integration tests using WireMock
//!
//! These tests run the client and the keywords against a mock HTTP server,
//! covering the full request/response cycle including query encoding,
//! Basic authentication and error mapping.

mod keywords;
mod messages;

use mailosaur_keywords::{MailosaurClient, MailosaurKeywords};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

pub const API_KEY: &str = "test-api-key";
/// base64("test-api-key:")
pub const AUTH_HEADER: &str = "Basic dGVzdC1hcGkta2V5Og==";
pub const SERVER_ID: &str = "abcd1234";
pub const SERVER_DOMAIN: &str = "abcd1234.mailosaur.net";

/// Creates a client pointing at the mock server.
pub fn client_for(server: &MockServer) -> MailosaurClient {
    MailosaurClient::builder()
        .api_key(API_KEY)
        .base_url(server.uri())
        .wait_timeout(Duration::from_secs(2))
        .build()
        .expect("Failed to build client")
}

/// Creates a keyword provider pointing at the mock server.
pub fn keywords_for(server: &MockServer) -> MailosaurKeywords {
    MailosaurKeywords::with_client(client_for(server), SERVER_ID, SERVER_DOMAIN)
}

/// Helper to create an authenticated mock.
pub fn mock_with_auth(method_matcher: &str, path_matcher: &str) -> MockBuilder {
    Mock::given(method(method_matcher))
        .and(path(path_matcher))
        .and(header("Authorization", AUTH_HEADER))
}

/// A message as the API returns it.
pub fn message_body(subject: &str) -> Value {
    json!({
        "id": "msg-1",
        "type": "Email",
        "from": [{ "name": "Support", "email": "support@example.com" }],
        "to": [{ "name": "Test User", "email": "user@abcd1234.mailosaur.net" }],
        "cc": [],
        "bcc": [],
        "received": "2024-05-01T10:15:00.000Z",
        "subject": subject,
        "html": {
            "links": [
                { "href": "https://example.com/activate", "text": "Activate account" },
                { "href": "https://example.com/help", "text": "Help" },
                { "href": "https://example.com/unsubscribe", "text": "Unsubscribe" }
            ],
            "codes": [],
            "images": [],
            "body": "<p>Hello World</p>"
        },
        "text": {
            "links": [
                { "href": "https://example.com/activate", "text": "https://example.com/activate" }
            ],
            "codes": [{ "value": "123456" }],
            "body": "Hello World\nYour code is 123456"
        },
        "attachments": [
            {
                "id": "att-1",
                "contentType": "application/pdf",
                "fileName": "invoice.pdf",
                "length": 2048,
                "url": "https://mailosaur.com/api/files/attachments/att-1"
            }
        ],
        "metadata": {
            "headers": [{ "field": "X-Mailer", "value": "Acme" }]
        },
        "server": SERVER_ID
    })
}

/// A search result with one summary.
pub fn search_hit() -> Value {
    json!({
        "items": [{
            "id": "msg-1",
            "type": "Email",
            "server": SERVER_ID,
            "from": [{ "name": "Support", "email": "support@example.com" }],
            "to": [{ "email": "user@abcd1234.mailosaur.net" }],
            "received": "2024-05-01T10:15:00.000Z",
            "subject": "Welcome",
            "summary": "Hello World",
            "attachments": 1
        }]
    })
}

/// Mounts a search hit followed by the full message.
pub async fn mount_message(server: &MockServer, message: Value) {
    mock_with_auth("POST", "/api/messages/search")
        .respond_with(ResponseTemplate::new(200).set_body_json(search_hit()))
        .mount(server)
        .await;

    mock_with_auth("GET", "/api/messages/msg-1")
        .respond_with(ResponseTemplate::new(200).set_body_json(message))
        .mount(server)
        .await;
}
