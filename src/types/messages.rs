//! Message types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A full email (or SMS) message.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID.
    pub id: String,

    /// Message type ("Email" or "SMS").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,

    /// Sender addresses.
    #[serde(rename = "from", default, deserialize_with = "null_as_default")]
    pub sender: Vec<MessageAddress>,

    /// Recipient addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: Vec<MessageAddress>,

    /// Carbon-copy addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub cc: Vec<MessageAddress>,

    /// Blind carbon-copy addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub bcc: Vec<MessageAddress>,

    /// When the message was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<DateTime<Utc>>,

    /// Subject line.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,

    /// HTML content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub html: MessageContent,

    /// Plain-text content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: MessageContent,

    /// Attachments.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: Vec<Attachment>,

    /// Header metadata.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: Metadata,

    /// ID of the server the message belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
}

impl Message {
    /// Returns the email address of the first sender.
    pub fn sender_email(&self) -> Option<&str> {
        self.sender.first().map(|a| a.email.as_str())
    }

    /// Returns the text of every link found in the plain-text content.
    pub fn text_link_texts(&self) -> impl Iterator<Item = &str> {
        self.text.links.iter().filter_map(|l| l.text.as_deref())
    }
}

/// An email address (or phone number) with an optional display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageAddress {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Email address.
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    /// Phone number (SMS only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl MessageAddress {
    /// Creates an address with a display name.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: email.into(),
            phone: None,
        }
    }
}

/// HTML or plain-text content of a message.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageContent {
    /// Links found in the content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub links: Vec<Link>,

    /// Verification codes found in the content.
    #[serde(default, deserialize_with = "null_as_default")]
    pub codes: Vec<Code>,

    /// Images found in the content (HTML only).
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<Image>,

    /// Raw body.
    #[serde(default, deserialize_with = "null_as_default")]
    pub body: String,
}

/// A hyperlink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    /// Target URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,

    /// Display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Link {
    /// Creates a link.
    pub fn new(href: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            text: Some(text.into()),
        }
    }
}

/// A verification code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Code {
    /// Code value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// An image reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Image {
    /// Image source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    /// Alt text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// Attachment metadata.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Attachment ID.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    /// MIME type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// File name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Content ID for inline attachments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,

    /// Size in bytes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub length: u64,

    /// Download URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Message header metadata.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Metadata {
    /// Raw headers.
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<MessageHeader>,
}

/// A single message header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageHeader {
    /// Header name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub field: String,
    /// Header value.
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

/// Summary of a message as returned by list and search.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSummary {
    /// Message ID.
    pub id: String,

    /// Message type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,

    /// Server ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    /// Sender addresses.
    #[serde(rename = "from", default, deserialize_with = "null_as_default")]
    pub sender: Vec<MessageAddress>,

    /// Recipient addresses.
    #[serde(default, deserialize_with = "null_as_default")]
    pub to: Vec<MessageAddress>,

    /// When the message was received.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<DateTime<Utc>>,

    /// Subject line.
    #[serde(default, deserialize_with = "null_as_default")]
    pub subject: String,

    /// Short summary of the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Number of attachments.
    #[serde(default, deserialize_with = "null_as_default")]
    pub attachments: u32,
}

/// Result of a list or search call.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageListResult {
    /// Matching messages, newest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<MessageSummary>,
}

impl MessageListResult {
    /// Returns the number of messages.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the newest message summary.
    pub fn first(&self) -> Option<&MessageSummary> {
        self.items.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_message_deserialization() {
        let json = r#"{
            "id": "msg-1",
            "type": "Email",
            "from": [{"name": "Support", "email": "support@example.com"}],
            "to": [{"name": null, "email": "user@abcd1234.mailosaur.net"}],
            "received": "2024-01-15T10:30:00Z",
            "subject": "Welcome",
            "html": {
                "links": [{"href": "https://example.com/a", "text": "Activate"}],
                "body": "<p>Hello</p>"
            },
            "text": {"links": [], "body": "Hello World"},
            "attachments": [{"id": "att-1", "contentType": "text/plain", "fileName": "a.txt", "length": 12}],
            "server": "abcd1234"
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();

        assert_eq!(message.subject, "Welcome");
        assert_eq!(message.sender_email(), Some("support@example.com"));
        assert_eq!(message.html.links.len(), 1);
        assert_eq!(message.text.body, "Hello World");
        assert_eq!(message.attachments[0].file_name.as_deref(), Some("a.txt"));
        assert_eq!(message.server.as_deref(), Some("abcd1234"));
        assert!(message.received.is_some());
    }

    #[test]
    fn test_null_content_blocks_become_empty() {
        let json = r#"{"id": "msg-2", "from": null, "subject": null, "html": null, "text": null, "attachments": null}"#;

        let message: Message = serde_json::from_str(json).unwrap();

        assert_eq!(message.subject, "");
        assert!(message.html.links.is_empty());
        assert_eq!(message.text.body, "");
        assert!(message.attachments.is_empty());
        assert_eq!(message.sender_email(), None);
    }

    #[test]
    fn test_null_scalar_fields_become_defaults() {
        let json = r#"{
            "id": "msg-3",
            "text": {"codes": [{"value": null}], "body": "Your code"},
            "attachments": [{"id": null, "fileName": "a.txt", "length": null}],
            "metadata": {"headers": [{"field": null, "value": "x"}]}
        }"#;

        let message: Message = serde_json::from_str(json).unwrap();

        assert_eq!(message.text.codes[0].value, "");
        assert_eq!(message.attachments.len(), 1);
        assert_eq!(message.attachments[0].id, "");
        assert_eq!(message.attachments[0].length, 0);
        assert_eq!(message.metadata.headers[0].field, "");

        let summary: MessageListResult =
            serde_json::from_str(r#"{"items": [{"id": "a", "attachments": null}]}"#).unwrap();
        assert_eq!(summary.items[0].attachments, 0);
    }

    #[test]
    fn test_text_link_texts_skips_missing_text() {
        let message = Message {
            text: MessageContent {
                links: vec![
                    Link::new("https://example.com/reset", "Reset password"),
                    Link {
                        href: Some("https://example.com/raw".to_string()),
                        text: None,
                    },
                ],
                ..Default::default()
            },
            ..Default::default()
        };

        let texts: Vec<&str> = message.text_link_texts().collect();
        assert_eq!(texts, vec!["Reset password"]);
    }

    #[test]
    fn test_message_list_result() {
        let json = r#"{"items": [{"id": "a", "subject": "First", "attachments": 2}, {"id": "b"}]}"#;
        let result: MessageListResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.first().map(|m| m.id.as_str()), Some("a"));
        assert_eq!(result.items[0].attachments, 2);
    }
}
