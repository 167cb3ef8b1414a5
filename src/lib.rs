//! Mailosaur Email Assertion Keywords
//!
//! An async Rust client for the Mailosaur email-testing API plus a small
//! library of keyword-style assertions over the most recent email delivered
//! to a Mailosaur server.
//!
//! # Features
//!
//! - **Messages API**: get, search (with server-side wait), list and delete
//! - **Keywords**: subject, body, link, attachment and sender assertions
//! - **Name dispatch**: run keywords by their human-readable names
//! - **Observability**: tracing spans and structured logging
//! - **Async/Await**: Built on Tokio
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mailosaur_keywords::MailosaurKeywords;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut keywords = MailosaurKeywords::new(
//!         "your_api_key",
//!         "abcd1234",
//!         "abcd1234.mailosaur.net",
//!     )?;
//!
//!     keywords.email_subject_should_match("Welcome").await?;
//!     keywords.email_body_should_contain("hello", true).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Running Keywords by Name
//!
//! ```rust,no_run
//! use mailosaur_keywords::MailosaurKeywords;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut keywords = MailosaurKeywords::from_env()?;
//!
//!     keywords
//!         .run_keyword("Email Should Have Links", &["3".to_string()])
//!         .await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod keywords;
pub mod library;
pub mod observability;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{MailosaurClient, MailosaurClientBuilder};
pub use config::MailosaurConfig;
pub use errors::{KeywordError, KeywordResult, MailosaurError, MailosaurResult};
pub use keywords::MailosaurKeywords;
pub use library::{KeywordSpec, LibraryScope, KEYWORDS, LIBRARY_SCOPE, LIBRARY_VERSION};

// Type re-exports
pub use types::messages::{
    Attachment, Code, Image, Link, Message, MessageAddress, MessageContent, MessageHeader,
    MessageListResult, MessageSummary, Metadata,
};
pub use types::search::{
    GetOptions, ListOptions, SearchCriteria, SearchMatchOperator, SearchOptions, SortDirection,
};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
