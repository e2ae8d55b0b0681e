use std::sync::Arc;
use std::time::Duration;
use validator::ValidateEmail;

use crate::config::Config;
use crate::notify::{DisabledTransport, Dispatcher, EmailRequest, MailTransport, SmtpMailer};
use crate::search::{Aggregator, RedditClient, SearchResult, StackExchangeClient};
use crate::types::{AppError, AppResult};
use crate::utils::SingleFlight;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub aggregator: Aggregator,
    pub stack_exchange: Arc<StackExchangeClient>,
    pub dispatcher: Dispatcher,
    pub searches: SingleFlight,
}

impl AppState {
    /// Wire the real providers and mail relay from configuration.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.server.http_timeout_secs))
            .user_agent(config.reddit.user_agent.clone())
            .build()?;

        let stack_exchange = Arc::new(StackExchangeClient::new(http.clone(), &config.stack_exchange));
        let reddit = Arc::new(RedditClient::new(http, config.reddit.clone()));
        if !config.reddit.is_configured() {
            tracing::warn!("Reddit credentials missing, searches will fail until they are set");
        }

        let transport: Arc<dyn MailTransport> = match SmtpMailer::from_config(&config.mail) {
            Ok(mailer) => Arc::new(mailer),
            Err(e) => {
                tracing::warn!(error = %e, "Email delivery disabled");
                Arc::new(DisabledTransport)
            }
        };

        Ok(Self {
            aggregator: Aggregator::new(stack_exchange.clone(), reddit),
            stack_exchange,
            dispatcher: Dispatcher::new(transport),
            searches: SingleFlight::new(),
            config,
        })
    }
}

// API Request/Response types

#[derive(Debug, serde::Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub struct SendEmailRequest {
    pub email: Option<String>,
    pub results: Option<Vec<SearchResult>>,
}

impl SendEmailRequest {
    /// Both fields must be present and non-empty, and the address must parse.
    pub fn into_email_request(self) -> AppResult<EmailRequest> {
        let email = self
            .email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        let results = self.results.filter(|r| !r.is_empty());

        let (Some(email), Some(results)) = (email, results) else {
            return Err(AppError::Validation("Email and results are required".to_string()));
        };

        if !email.validate_email() {
            return Err(AppError::Validation("Invalid email address".to_string()));
        }

        Ok(EmailRequest {
            recipient_address: email,
            results,
        })
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopAnswerResponse {
    pub question_id: u64,
    pub body: Option<String>,
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub reddit_configured: bool,
    pub mail_configured: bool,
}
