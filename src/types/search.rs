//! Search criteria and request options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How multiple criteria fields are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SearchMatchOperator {
    /// Every specified field must match.
    #[default]
    All,
    /// At least one specified field must match.
    Any,
}

/// Filter used to select messages on a server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    /// Sender address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_from: Option<String>,

    /// Recipient address or domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_to: Option<String>,

    /// Text the subject must contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Text the body must contain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Combination operator.
    #[serde(rename = "match", default)]
    pub match_operator: SearchMatchOperator,
}

impl SearchCriteria {
    /// Creates empty criteria.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the recipient filter.
    pub fn sent_to(mut self, sent_to: impl Into<String>) -> Self {
        self.sent_to = Some(sent_to.into());
        self
    }

    /// Sets the sender filter.
    pub fn sent_from(mut self, sent_from: impl Into<String>) -> Self {
        self.sent_from = Some(sent_from.into());
        self
    }

    /// Sets the subject filter.
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the body filter.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the combination operator.
    pub fn match_operator(mut self, operator: SearchMatchOperator) -> Self {
        self.match_operator = operator;
        self
    }
}

/// Sort direction for list and search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Oldest first.
    Ascending,
    /// Newest first.
    Descending,
}

impl SortDirection {
    /// Returns the query string value.
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "Ascending",
            SortDirection::Descending => "Descending",
        }
    }
}

/// Options for a search call.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Page number (zero based).
    pub page: Option<u32>,
    /// Page size.
    pub items_per_page: Option<u32>,
    /// How long to keep polling for a match. `None` or zero means no waiting.
    pub timeout: Option<Duration>,
    /// Only consider messages received after this instant.
    pub received_after: Option<DateTime<Utc>>,
    /// Fail with a search timeout instead of returning an empty result.
    pub error_on_timeout: bool,
    /// Sort direction.
    pub dir: Option<SortDirection>,
}

impl SearchOptions {
    /// Creates default options (no waiting, error on timeout).
    pub fn new() -> Self {
        Self {
            error_on_timeout: true,
            ..Default::default()
        }
    }

    /// Sets the page.
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Sets the page size.
    pub fn items_per_page(mut self, items: u32) -> Self {
        self.items_per_page = Some(items);
        self
    }

    /// Sets the wait timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the received-after cut-off.
    pub fn received_after(mut self, received_after: DateTime<Utc>) -> Self {
        self.received_after = Some(received_after);
        self
    }

    /// Sets whether running out of time is an error.
    pub fn error_on_timeout(mut self, error_on_timeout: bool) -> Self {
        self.error_on_timeout = error_on_timeout;
        self
    }

    /// Sets the sort direction.
    pub fn dir(mut self, dir: SortDirection) -> Self {
        self.dir = Some(dir);
        self
    }
}

/// Options for a list call.
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Page number (zero based).
    pub page: Option<u32>,
    /// Page size.
    pub items_per_page: Option<u32>,
    /// Only list messages received after this instant.
    pub received_after: Option<DateTime<Utc>>,
    /// Sort direction.
    pub dir: Option<SortDirection>,
}

/// Overrides for `get`; unset fields fall back to the client configuration.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// How long to wait for a matching message.
    pub timeout: Option<Duration>,
    /// Only consider messages received after this instant.
    pub received_after: Option<DateTime<Utc>>,
    /// Sort direction.
    pub dir: Option<SortDirection>,
}
