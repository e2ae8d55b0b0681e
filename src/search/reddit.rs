//! Reddit client
//!
//! Uses the installed-app refresh token flow: the long-lived refresh token is
//! exchanged for a short-lived bearer token, which is reused until shortly
//! before it expires.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult, SortOrder, Source};
use crate::config::RedditConfig;

const PROVIDER: &str = "reddit";

/// Refresh this long before the provider-reported expiry
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<ListingChild>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: RedditPost,
}

/// Post as it appears in a search listing
#[derive(Debug, Clone, Deserialize)]
pub struct RedditPost {
    pub title: String,
    pub subreddit: String,
    #[serde(default)]
    pub author: Option<String>,
    pub permalink: String,
    #[serde(default)]
    pub selftext: Option<String>,
    #[serde(default)]
    pub score: i64,
}

impl RedditPost {
    pub fn into_result(self) -> SearchResult {
        let author = self
            .author
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| "[deleted]".to_string());

        SearchResult {
            source: Source::Reddit,
            title: if self.title.trim().is_empty() { "Untitled".to_string() } else { self.title },
            url: format!("https://reddit.com{}", self.permalink),
            author_url: if author == "[deleted]" {
                None
            } else {
                Some(format!("https://reddit.com/user/{}", author))
            },
            author,
            community_label: self.subreddit,
            tags: Vec::new(),
            body: self.selftext.filter(|text| !text.is_empty()),
            question_id: None,
            score: Some(self.score),
        }
    }
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

pub struct RedditClient {
    client: Client,
    config: RedditConfig,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(client: Client, config: RedditConfig) -> Self {
        Self {
            client,
            config,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, SearchError> {
        if !self.config.is_configured() {
            return Err(SearchError::NotConfigured { provider: PROVIDER });
        }

        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.value.clone());
            }
        }

        debug!("Refreshing Reddit access token");

        let url = format!("{}/api/v1/access_token", self.config.auth_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.config.refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Auth {
                provider: PROVIDER,
                message: format!("token endpoint returned HTTP {}", status.as_u16()),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| SearchError::Auth {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(token.access_token)
    }
}

#[async_trait]
impl SearchProvider for RedditClient {
    fn source(&self) -> Source {
        Source::Reddit
    }

    async fn search(&self, query: &str, sort: SortOrder) -> Result<Vec<SearchResult>, SearchError> {
        info!(query = %query, sort = sort.as_reddit(), "Searching Reddit");

        let token = self.access_token().await?;
        let url = format!("{}/search", self.config.api_url.trim_end_matches('/'));
        let limit = self.config.limit.to_string();

        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .query(&[
                ("q", query),
                ("sort", sort.as_reddit()),
                ("t", "all"),
                ("limit", limit.as_str()),
                ("raw_json", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
            });
        }

        let listing: Listing = response.json().await.map_err(|e| SearchError::ParseError {
            provider: PROVIDER,
            message: e.to_string(),
        })?;

        let results: Vec<SearchResult> = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.into_result())
            .collect();

        info!(count = results.len(), "Reddit search completed");
        Ok(results)
    }
}
