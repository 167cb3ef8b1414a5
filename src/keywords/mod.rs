//! Email assertion keywords.
//!
//! [`MailosaurKeywords`] fetches the newest message sent to the configured
//! server domain and checks one property of it per call. A mismatch is
//! reported as [`KeywordError::Assertion`]; client failures come back
//! unchanged as [`KeywordError::Client`].

use tracing::instrument;

use crate::client::MailosaurClient;
use crate::errors::{KeywordError, KeywordResult, MailosaurError, MailosaurResult};
use crate::observability::RequestTimer;
use crate::types::messages::Message;
use crate::types::search::SearchCriteria;

/// Keyword provider bound to one Mailosaur server.
///
/// # Example
///
/// ```rust,no_run
/// use mailosaur_keywords::MailosaurKeywords;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut keywords = MailosaurKeywords::new(
///         "your_api_key",
///         "abcd1234",
///         "abcd1234.mailosaur.net",
///     )?;
///
///     keywords.email_subject_should_match("Welcome").await?;
///     keywords.email_should_have_links(3).await?;
///     keywords.delete_all_emails().await?;
///     Ok(())
/// }
/// ```
pub struct MailosaurKeywords {
    client: MailosaurClient,
    server_id: String,
    server_domain: String,
    criteria: SearchCriteria,
}

impl MailosaurKeywords {
    /// Creates a keyword provider with a default client for `api_key`.
    pub fn new(
        api_key: impl Into<String>,
        server_id: impl Into<String>,
        server_domain: impl Into<String>,
    ) -> MailosaurResult<Self> {
        let client = MailosaurClient::from_api_key(api_key)?;
        Ok(Self::with_client(client, server_id, server_domain))
    }

    /// Creates a keyword provider around an existing client.
    pub fn with_client(
        client: MailosaurClient,
        server_id: impl Into<String>,
        server_domain: impl Into<String>,
    ) -> Self {
        Self {
            client,
            server_id: server_id.into(),
            server_domain: server_domain.into(),
            criteria: SearchCriteria::new(),
        }
    }

    /// Creates a keyword provider from environment variables.
    ///
    /// Reads the client settings (see [`MailosaurClient::from_env`]) plus
    /// `MAILOSAUR_SERVER_ID` and `MAILOSAUR_SERVER_DOMAIN`.
    pub fn from_env() -> MailosaurResult<Self> {
        let client = MailosaurClient::from_env()?;
        let server_id = required_env("MAILOSAUR_SERVER_ID")?;
        let server_domain = required_env("MAILOSAUR_SERVER_DOMAIN")?;
        Ok(Self::with_client(client, server_id, server_domain))
    }

    /// Returns the server ID messages are fetched from.
    pub fn server_id(&self) -> &str {
        &self.server_id
    }

    /// Returns the domain messages must have been sent to.
    pub fn server_domain(&self) -> &str {
        &self.server_domain
    }

    /// Returns the criteria used by the most recent request.
    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }

    /// Returns the underlying client.
    pub fn client(&self) -> &MailosaurClient {
        &self.client
    }

    /// Checks the subject of the last email received on the server domain
    /// equals `matcher`.
    #[instrument(skip(self), fields(server = %self.server_id))]
    pub async fn email_subject_should_match(&mut self, matcher: &str) -> KeywordResult<()> {
        let timer = RequestTimer::start("email_subject_should_match");
        let result = self
            .last_email()
            .await
            .and_then(|email| subject_equals(&email.subject, matcher));
        timer.finish(result.is_ok());
        result
    }

    /// Checks the subject of the last email received on the server domain
    /// contains `matcher`.
    #[instrument(skip(self), fields(server = %self.server_id))]
    pub async fn email_subject_should_contain(&mut self, matcher: &str) -> KeywordResult<()> {
        let timer = RequestTimer::start("email_subject_should_contain");
        let result = self
            .last_email()
            .await
            .and_then(|email| subject_contains(&email.subject, matcher));
        timer.finish(result.is_ok());
        result
    }

    /// Deletes every email on the server.
    #[instrument(skip(self), fields(server = %self.server_id))]
    pub async fn delete_all_emails(&mut self) -> KeywordResult<()> {
        let timer = RequestTimer::start("delete_all_emails");
        self.criteria.sent_to = Some(self.server_domain.clone());
        let result = self
            .client
            .messages()
            .delete_all(&self.server_id)
            .await
            .map_err(KeywordError::from);
        timer.finish(result.is_ok());
        result
    }

    /// Checks the HTML part of the last email contains exactly
    /// `links_number` links.
    #[instrument(skip(self), fields(server = %self.server_id))]
    pub async fn email_should_have_links(&mut self, links_number: usize) -> KeywordResult<()> {
        let timer = RequestTimer::start("email_should_have_links");
        let result = self
            .last_email()
            .await
            .and_then(|email| count_equals(email.html.links.len(), links_number));
        timer.finish(result.is_ok());
        result
    }

    /// Checks the last email has exactly `attachments_number` attachments.
    #[instrument(skip(self), fields(server = %self.server_id))]
    pub async fn email_should_have_attachments(
        &mut self,
        attachments_number: usize,
    ) -> KeywordResult<()> {
        let timer = RequestTimer::start("email_should_have_attachments");
        let result = self
            .last_email()
            .await
            .and_then(|email| count_equals(email.attachments.len(), attachments_number));
        timer.finish(result.is_ok());
        result
    }

    /// Checks the plain-text body of the last email contains `matcher`.
    ///
    /// With `case_insensitive` both sides are lower-cased before comparing.
    #[instrument(skip(self), fields(server = %self.server_id))]
    pub async fn email_body_should_contain(
        &mut self,
        matcher: &str,
        case_insensitive: bool,
    ) -> KeywordResult<()> {
        let timer = RequestTimer::start("email_body_should_contain");
        let result = self
            .last_email()
            .await
            .and_then(|email| body_contains(&email.text.body, matcher, case_insensitive));
        timer.finish(result.is_ok());
        result
    }

    /// Checks at least one link in the plain-text part of the last email
    /// has display text containing `text`.
    #[instrument(skip(self), fields(server = %self.server_id))]
    pub async fn email_links_should_contain_text(&mut self, text: &str) -> KeywordResult<()> {
        let timer = RequestTimer::start("email_links_should_contain_text");
        let result = self
            .last_email()
            .await
            .and_then(|email| any_link_text_contains(&email, text));
        timer.finish(result.is_ok());
        result
    }

    /// Checks the first sender of the last email is `matcher`.
    #[instrument(skip(self), fields(server = %self.server_id))]
    pub async fn email_sender_should_be(&mut self, matcher: &str) -> KeywordResult<()> {
        let timer = RequestTimer::start("email_sender_should_be");
        let result = self
            .last_email()
            .await
            .and_then(|email| {
                let sender = email.sender_email().ok_or_else(|| KeywordError::MissingField {
                    message_id: email.id.clone(),
                    field: "sender",
                })?;
                sender_equals(sender, matcher)
            });
        timer.finish(result.is_ok());
        result
    }

    /// Points the criteria at the server domain and fetches the newest match.
    async fn last_email(&mut self) -> KeywordResult<Message> {
        self.criteria.sent_to = Some(self.server_domain.clone());
        let email = self
            .client
            .messages()
            .get(&self.server_id, &self.criteria)
            .await?;
        tracing::debug!(message_id = %email.id, "Fetched last email");
        Ok(email)
    }
}

impl std::fmt::Debug for MailosaurKeywords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailosaurKeywords")
            .field("client", &self.client)
            .field("server_id", &self.server_id)
            .field("server_domain", &self.server_domain)
            .finish()
    }
}

fn required_env(name: &str) -> MailosaurResult<String> {
    std::env::var(name)
        .map_err(|_| MailosaurError::configuration(format!("Environment variable {} not set", name)))
}

fn subject_equals(actual: &str, expected: &str) -> KeywordResult<()> {
    if actual == expected {
        return Ok(());
    }
    Err(KeywordError::Assertion(format!(
        "AssertionError: '{}' does not equal '{}'",
        actual, expected
    )))
}

fn subject_contains(actual: &str, expected: &str) -> KeywordResult<()> {
    if actual.contains(expected) {
        return Ok(());
    }
    Err(KeywordError::Assertion(format!(
        "AssertionError: '{}' does not contain '{}'",
        actual, expected
    )))
}

fn count_equals(actual: usize, expected: usize) -> KeywordResult<()> {
    if actual == expected {
        return Ok(());
    }
    Err(KeywordError::Assertion(format!(
        "AssertionError: {} does not equal {}",
        actual, expected
    )))
}

fn body_contains(body: &str, matcher: &str, case_insensitive: bool) -> KeywordResult<()> {
    let (body, matcher) = if case_insensitive {
        (body.to_lowercase(), matcher.to_lowercase())
    } else {
        (body.to_string(), matcher.to_string())
    };

    if body.contains(&matcher) {
        return Ok(());
    }
    Err(KeywordError::Assertion(format!(
        "AssertionError: {} is not contained {}",
        matcher, body
    )))
}

fn any_link_text_contains(email: &Message, text: &str) -> KeywordResult<()> {
    if email.text_link_texts().any(|link| link.contains(text)) {
        Ok(())
    } else {
        Err(KeywordError::AssertionFailed)
    }
}

// Expected value comes first in this message.
fn sender_equals(actual: &str, expected: &str) -> KeywordResult<()> {
    if actual == expected {
        return Ok(());
    }
    Err(KeywordError::Assertion(format!(
        "AssertionError: '{}' does not match sender '{}'",
        expected, actual
    )))
}
