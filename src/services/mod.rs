//! Service implementations for the Mailosaur API.

mod messages;

pub use messages::MessagesService;
