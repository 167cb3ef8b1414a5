//! Messages service.

use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::instrument;

use crate::auth::AuthProvider;
use crate::config::MailosaurConfig;
use crate::errors::{ApiErrorResponse, MailosaurError, MailosaurResult};
use crate::observability::redact_secrets;
use crate::transport::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::messages::{Message, MessageListResult};
use crate::types::search::{GetOptions, ListOptions, SearchCriteria, SearchOptions, SortDirection};

/// Polling pattern used when the API sends no `x-ms-delay` header.
const DEFAULT_DELAY_PATTERN: &str = "10000";

/// Fallback polling delay in milliseconds.
const DEFAULT_POLL_DELAY_MS: u64 = 10_000;

/// Length of a Mailosaur server ID.
const SERVER_ID_LENGTH: usize = 8;

const SEARCH_TIMEOUT_MESSAGE: &str = "No matching messages found in time. By default, only messages received in the last hour are checked (use receivedAfter to override this).";

/// Messages service for retrieving and deleting messages.
pub struct MessagesService {
    transport: Arc<dyn HttpTransport>,
    auth: Arc<dyn AuthProvider>,
    wait_timeout: Duration,
    received_window: Duration,
}

impl MessagesService {
    /// Creates a new messages service.
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
        config: &MailosaurConfig,
    ) -> Self {
        Self {
            transport,
            auth,
            wait_timeout: config.wait_timeout,
            received_window: config.received_window,
        }
    }

    /// Waits for the newest message on `server` matching `criteria` and
    /// returns it in full.
    ///
    /// Uses the configured wait timeout and only considers messages received
    /// within the configured window.
    pub async fn get(&self, server: &str, criteria: &SearchCriteria) -> MailosaurResult<Message> {
        self.get_with(server, criteria, GetOptions::default()).await
    }

    /// Like [`get`](Self::get) with explicit overrides.
    #[instrument(skip(self, criteria, options), fields(server = %server))]
    pub async fn get_with(
        &self,
        server: &str,
        criteria: &SearchCriteria,
        options: GetOptions,
    ) -> MailosaurResult<Message> {
        if server.chars().count() != SERVER_ID_LENGTH {
            return Err(MailosaurError::invalid_request(
                "Must provide a valid Server ID.",
            ));
        }

        let received_after = options
            .received_after
            .unwrap_or_else(|| self.default_received_after());

        let mut search = SearchOptions::new()
            .page(0)
            .items_per_page(1)
            .timeout(options.timeout.unwrap_or(self.wait_timeout))
            .received_after(received_after);
        search.dir = options.dir;

        let result = self.search(server, criteria, search).await?;
        let newest = result.first().ok_or_else(|| MailosaurError::SearchTimeout {
            message: SEARCH_TIMEOUT_MESSAGE.to_string(),
        })?;

        self.get_by_id(&newest.id).await
    }

    /// Retrieves a full message by ID.
    #[instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> MailosaurResult<Message> {
        if id.is_empty() {
            return Err(MailosaurError::invalid_request("Message ID is required"));
        }

        let request = self.build_request(HttpRequest::get(format!("api/messages/{}", id)));
        let response = self.transport.send(request).await?;
        self.parse_response(response)
    }

    /// Lists message summaries on a server, newest first.
    #[instrument(skip(self, options))]
    pub async fn list(&self, server: &str, options: ListOptions) -> MailosaurResult<MessageListResult> {
        let mut request = self.build_request(HttpRequest::get("api/messages"));
        request.query = list_query(
            server,
            options.page,
            options.items_per_page,
            options.received_after,
            options.dir,
        );

        let response = self.transport.send(request).await?;
        self.parse_response(response)
    }

    /// Searches for messages matching `criteria`.
    ///
    /// When `options.timeout` is set and non-zero, the search is repeated
    /// until a match appears, following the delay pattern in the
    /// `x-ms-delay` response header, or until the next delay would overrun
    /// the timeout.
    #[instrument(skip(self, criteria, options), fields(server = %server))]
    pub async fn search(
        &self,
        server: &str,
        criteria: &SearchCriteria,
        options: SearchOptions,
    ) -> MailosaurResult<MessageListResult> {
        let body = serde_json::to_vec(criteria)?;
        let mut request = self.build_request(
            HttpRequest::post("api/messages/search")
                .with_header("Content-Type", "application/json")
                .with_body(body),
        );
        request.query = list_query(
            server,
            options.page,
            options.items_per_page,
            options.received_after,
            options.dir,
        );

        let timeout_ms = options.timeout.map_or(0, |t| t.as_millis());
        let started = Instant::now();
        let mut poll_count = 0;

        loop {
            let response = self.transport.send(request.clone()).await?;
            if response.status != 200 {
                return Err(self.parse_error_response(&response));
            }

            let result: MessageListResult = response.json()?;
            if timeout_ms == 0 || !result.is_empty() {
                return Ok(result);
            }

            let delay_ms = next_delay(response.header("x-ms-delay"), poll_count);
            poll_count += 1;

            if started.elapsed().as_millis() + u128::from(delay_ms) > timeout_ms {
                if !options.error_on_timeout {
                    return Ok(result);
                }
                return Err(MailosaurError::SearchTimeout {
                    message: SEARCH_TIMEOUT_MESSAGE.to_string(),
                });
            }

            tracing::debug!(poll_count, delay_ms, "No matching messages yet");
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    /// Permanently deletes a single message.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> MailosaurResult<()> {
        if id.is_empty() {
            return Err(MailosaurError::invalid_request("Message ID is required"));
        }

        let request = self.build_request(HttpRequest::delete(format!("api/messages/{}", id)));
        let response = self.transport.send(request).await?;
        self.expect_no_content(&response)
    }

    /// Permanently deletes every message on a server.
    #[instrument(skip(self))]
    pub async fn delete_all(&self, server: &str) -> MailosaurResult<()> {
        let request = self.build_request(
            HttpRequest::delete("api/messages").with_query("server", server),
        );
        let response = self.transport.send(request).await?;
        self.expect_no_content(&response)
    }

    fn default_received_after(&self) -> DateTime<Utc> {
        let window = chrono::Duration::from_std(self.received_window)
            .unwrap_or_else(|_| chrono::Duration::hours(1));
        Utc::now() - window
    }

    /// Applies auth and common headers.
    fn build_request(&self, mut request: HttpRequest) -> HttpRequest {
        request
            .headers
            .insert("Accept".to_string(), "application/json".to_string());
        self.auth.apply_auth(&mut request.headers);
        request
    }

    fn expect_no_content(&self, response: &HttpResponse) -> MailosaurResult<()> {
        if response.status == 204 {
            Ok(())
        } else {
            Err(self.parse_error_response(response))
        }
    }

    /// Parses a successful JSON response.
    fn parse_response<T: serde::de::DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> MailosaurResult<T> {
        if response.status != 200 {
            return Err(self.parse_error_response(&response));
        }

        response.json().map_err(|e| MailosaurError::Serialization {
            message: format!("Failed to parse response: {}", e),
        })
    }

    /// Maps a non-success response to an error.
    fn parse_error_response(&self, response: &HttpResponse) -> MailosaurError {
        let body = String::from_utf8_lossy(&response.body).to_string();
        tracing::warn!(
            status = response.status,
            body = %redact_secrets(&body),
            "Mailosaur API returned an error"
        );

        match response.status {
            400 => {
                let mut message = String::from("Request had one or more invalid parameters.");
                if let Ok(parsed) = serde_json::from_slice::<ApiErrorResponse>(&response.body) {
                    for err in parsed.errors {
                        if let Some(detail) = err.detail.first() {
                            message.push_str(&format!("\n({}) {}", err.field, detail.description));
                        }
                    }
                }
                MailosaurError::InvalidRequest { message }
            }
            401 => MailosaurError::Authentication {
                message: "Authentication failed, check your API key.".to_string(),
            },
            403 => MailosaurError::Permission {
                message: "Insufficient permission to perform that task.".to_string(),
            },
            404 => MailosaurError::NotFound {
                message: "Not found, check input parameters.".to_string(),
            },
            status => MailosaurError::Api {
                message: "An API error occurred, see httpResponse for further information."
                    .to_string(),
                status_code: status,
                body: if body.is_empty() { None } else { Some(body) },
            },
        }
    }
}

impl std::fmt::Debug for MessagesService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagesService")
            .field("wait_timeout", &self.wait_timeout)
            .field("received_window", &self.received_window)
            .finish()
    }
}

/// Builds the query string shared by list and search.
fn list_query(
    server: &str,
    page: Option<u32>,
    items_per_page: Option<u32>,
    received_after: Option<DateTime<Utc>>,
    dir: Option<SortDirection>,
) -> Vec<(String, String)> {
    let mut query = vec![("server".to_string(), server.to_string())];
    if let Some(page) = page {
        query.push(("page".to_string(), page.to_string()));
    }
    if let Some(items) = items_per_page {
        query.push(("itemsPerPage".to_string(), items.to_string()));
    }
    if let Some(after) = received_after {
        query.push((
            "receivedAfter".to_string(),
            after.to_rfc3339_opts(SecondsFormat::Millis, true),
        ));
    }
    if let Some(dir) = dir {
        query.push(("dir".to_string(), dir.as_str().to_string()));
    }
    query
}

/// Picks the delay for the given poll from an `x-ms-delay` pattern.
///
/// Polls past the end of the pattern reuse its last entry.
fn next_delay(header: Option<&str>, poll_count: usize) -> u64 {
    let pattern: Vec<u64> = header
        .unwrap_or(DEFAULT_DELAY_PATTERN)
        .split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect();

    pattern
        .get(poll_count)
        .or_else(|| pattern.last())
        .copied()
        .unwrap_or(DEFAULT_POLL_DELAY_MS)
}
