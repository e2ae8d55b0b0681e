//! Notification Dispatcher
//!
//! Turns a result list into an HTML digest and hands it to a mail transport.
//! Sending is attempted exactly once; failures go back to the caller.

pub mod dispatcher;
pub mod smtp;

use async_trait::async_trait;
use thiserror::Error;

use crate::search::SearchResult;

pub use dispatcher::Dispatcher;
pub use smtp::SmtpMailer;

pub const EMAIL_SUBJECT: &str = "Search Results from StackOverflow and Reddit";

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Mail transport not configured")]
    NotConfigured,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Mail transport rejected the message: {0}")]
    Transport(String),
}

/// A validated digest request: a recipient and at least one result.
#[derive(Debug, Clone)]
pub struct EmailRequest {
    pub recipient_address: String,
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DispatchError>;
}

/// Stand-in used when no SMTP credentials are configured.
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, _email: OutgoingEmail) -> Result<(), DispatchError> {
        Err(DispatchError::NotConfigured)
    }
}
