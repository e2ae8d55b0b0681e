use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub stack_exchange: StackExchangeConfig,
    pub reddit: RedditConfig,
    pub mail: MailConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub cors_allowed_origins: Vec<String>,
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct StackExchangeConfig {
    pub api_url: String,
    pub site: String,
    pub page_size: u32,
    pub detail_concurrency: usize,
}

#[derive(Clone)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub auth_url: String,
    pub api_url: String,
    pub limit: u32,
}

impl RedditConfig {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty() && !self.refresh_token.is_empty()
    }
}

// Keep secrets out of the startup log line.
impl std::fmt::Debug for RedditConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedditConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &mask(&self.client_secret))
            .field("refresh_token", &mask(&self.refresh_token))
            .field("user_agent", &self.user_agent)
            .field("auth_url", &self.auth_url)
            .field("api_url", &self.api_url)
            .field("limit", &self.limit)
            .finish()
    }
}

#[derive(Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl MailConfig {
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &mask(&self.password))
            .field("from", &self.from)
            .finish()
    }
}

fn mask(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "********"
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let username = env::var("EMAIL_USER").unwrap_or_default();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                cors_allowed_origins: env::var("ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "15".to_string())
                    .parse()?,
            },
            stack_exchange: StackExchangeConfig {
                api_url: env::var("STACKEXCHANGE_API_URL")
                    .unwrap_or_else(|_| "https://api.stackexchange.com/2.3".to_string()),
                site: env::var("STACKEXCHANGE_SITE").unwrap_or_else(|_| "stackoverflow".to_string()),
                page_size: env::var("STACKEXCHANGE_PAGE_SIZE")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()?,
                detail_concurrency: env::var("STACKEXCHANGE_DETAIL_CONCURRENCY")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()?,
            },
            reddit: RedditConfig {
                client_id: env::var("REDDIT_CLIENT_ID").unwrap_or_default(),
                client_secret: env::var("REDDIT_CLIENT_SECRET").unwrap_or_default(),
                refresh_token: env::var("REDDIT_REFRESH_TOKEN").unwrap_or_default(),
                user_agent: env::var("REDDIT_USER_AGENT")
                    .unwrap_or_else(|_| format!("qa-digest/{}", env!("CARGO_PKG_VERSION"))),
                auth_url: env::var("REDDIT_AUTH_URL")
                    .unwrap_or_else(|_| "https://www.reddit.com".to_string()),
                api_url: env::var("REDDIT_API_URL")
                    .unwrap_or_else(|_| "https://oauth.reddit.com".to_string()),
                limit: env::var("REDDIT_LIMIT")
                    .unwrap_or_else(|_| "25".to_string())
                    .parse()?,
            },
            mail: MailConfig {
                smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
                smtp_port: env::var("SMTP_PORT")
                    .unwrap_or_else(|_| "465".to_string())
                    .parse()?,
                from: env::var("EMAIL_FROM").unwrap_or_else(|_| username.clone()),
                password: env::var("EMAIL_PASS").unwrap_or_default(),
                username,
            },
        })
    }
}
