use std::sync::Arc;
use tracing::info;

use super::{DispatchError, EmailRequest, MailTransport, OutgoingEmail, EMAIL_SUBJECT};
use crate::render;
use crate::search::{SearchResult, Source};

#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn MailTransport>,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn MailTransport>) -> Self {
        Self { transport }
    }

    /// Split results by source, render the digest and send it once.
    pub async fn dispatch(&self, request: EmailRequest) -> Result<(), DispatchError> {
        let (qa, social): (Vec<SearchResult>, Vec<SearchResult>) = request
            .results
            .into_iter()
            .partition(|result| result.source == Source::StackOverflow);

        info!(
            recipient = %request.recipient_address,
            stack_overflow = qa.len(),
            reddit = social.len(),
            "Sending results email"
        );

        let html = render::email_html(&qa, &social);

        self.transport
            .send(OutgoingEmail {
                to: request.recipient_address,
                subject: EMAIL_SUBJECT.to_string(),
                html,
            })
            .await
    }
}
