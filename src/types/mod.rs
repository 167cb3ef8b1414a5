//! Type definitions for the Mailosaur API.
//!
//! Covers the message model returned by the API and the search criteria
//! used to select messages.

pub mod messages;
pub mod search;
