// SMTP relay transport (implicit TLS on 465, STARTTLS otherwise)

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use super::{DispatchError, MailTransport, OutgoingEmail};
use crate::config::MailConfig;

const IMPLICIT_TLS_PORT: u16 = 465;

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn from_config(config: &MailConfig) -> Result<Self, DispatchError> {
        if !config.is_configured() {
            return Err(DispatchError::NotConfigured);
        }

        let from = parse_mailbox(&config.from)?;

        let builder = if config.smtp_port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
        }
        .map_err(|e| DispatchError::Transport(e.to_string()))?;

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build();

        info!(host = %config.smtp_host, port = config.smtp_port, "SMTP transport ready");

        Ok(Self { transport, from })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), DispatchError> {
        let message = build_message(self.from.clone(), email)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| DispatchError::Transport(e.to_string()))?;

        debug!(code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DispatchError> {
    address
        .parse::<Mailbox>()
        .map_err(|e| DispatchError::InvalidAddress(format!("{}: {}", address, e)))
}

fn build_message(from: Mailbox, email: OutgoingEmail) -> Result<Message, DispatchError> {
    let to = parse_mailbox(&email.to)?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(email.subject)
        .header(ContentType::TEXT_HTML)
        .body(email.html)
        .map_err(|e| DispatchError::Build(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::EMAIL_SUBJECT;

    fn mail_config() -> MailConfig {
        MailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 465,
            username: "sender@example.com".to_string(),
            password: "app-password".to_string(),
            from: "sender@example.com".to_string(),
        }
    }

    #[test]
    fn test_requires_credentials() {
        let mut config = mail_config();
        config.password.clear();
        assert!(matches!(SmtpMailer::from_config(&config), Err(DispatchError::NotConfigured)));
    }

    #[test]
    fn test_build_message_is_html() {
        let from = parse_mailbox("sender@example.com").unwrap();
        let message = build_message(
            from,
            OutgoingEmail {
                to: "reader@example.com".to_string(),
                subject: EMAIL_SUBJECT.to_string(),
                html: "<h2>Search Results</h2>".to_string(),
            },
        )
        .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Content-Type: text/html"));
        assert!(raw.contains("To: reader@example.com"));
        assert!(raw.contains("<h2>Search Results</h2>"));
    }

    #[test]
    fn test_rejects_bad_recipient() {
        let from = parse_mailbox("sender@example.com").unwrap();
        let err = build_message(
            from,
            OutgoingEmail {
                to: "not an address".to_string(),
                subject: EMAIL_SUBJECT.to_string(),
                html: String::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidAddress(_)));
    }
}
