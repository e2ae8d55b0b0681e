//! Stack Exchange client
//!
//! Question search is a two step affair:
//!
//! 1. `/search` by title returns the matching question ids
//! 2. `/questions/{id}` is fetched per hit with a filter that includes the body
//!
//! A failing detail lookup drops that one question and keeps the rest. Only a
//! failing title search fails the whole call.
//!
//! The top-voted answer is not part of the search payload; the page asks for
//! it lazily through [`StackExchangeClient::top_answer`].

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult, SortOrder, Source};
use crate::config::StackExchangeConfig;

const PROVIDER: &str = "stackexchange";

/// Filter that adds `body` to question and answer payloads
const BODY_FILTER: &str = "!9_bDE(fI5";

#[derive(Debug, Deserialize)]
struct ItemsEnvelope<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    question_id: u64,
}

#[derive(Debug, Deserialize)]
struct AnswerItem {
    #[serde(default)]
    body: Option<String>,
}

/// Question as returned by `/questions/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question_id: u64,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub owner: Option<QuestionOwner>,
    pub link: String,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub score: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOwner {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
}

impl QuestionDetail {
    pub fn into_result(self, site: &str) -> SearchResult {
        let (author, author_url) = match self.owner {
            Some(owner) => (
                owner
                    .display_name
                    .map(|name| decode_entities(&name))
                    .filter(|name| !name.trim().is_empty())
                    .unwrap_or_else(|| "anonymous".to_string()),
                owner.link,
            ),
            None => ("anonymous".to_string(), None),
        };

        let title = decode_entities(&self.title);

        SearchResult {
            source: Source::StackOverflow,
            title: if title.trim().is_empty() { "Untitled".to_string() } else { title },
            url: self.link,
            author,
            author_url,
            community_label: site.to_string(),
            tags: self.tags,
            body: self.body,
            question_id: Some(self.question_id),
            score: Some(self.score),
        }
    }
}

pub struct StackExchangeClient {
    client: Client,
    base_url: String,
    site: String,
    page_size: u32,
    detail_concurrency: usize,
}

impl StackExchangeClient {
    pub fn new(client: Client, config: &StackExchangeConfig) -> Self {
        Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            site: config.site.clone(),
            page_size: config.page_size,
            detail_concurrency: config.detail_concurrency.max(1),
        }
    }

    /// Title search. Returns question ids in provider order.
    pub async fn search_ids(&self, query: &str, sort: SortOrder) -> Result<Vec<u64>, SearchError> {
        let url = format!("{}/search", self.base_url);
        let page_size = self.page_size.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("intitle", query),
                ("order", "desc"),
                ("sort", sort.as_stack_exchange()),
                ("site", self.site.as_str()),
                ("filter", "default"),
                ("pagesize", page_size.as_str()),
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

        let envelope: ItemsEnvelope<SearchHit> =
            response.json().await.map_err(|e| SearchError::ParseError {
                provider: PROVIDER,
                message: e.to_string(),
            })?;

        Ok(envelope.items.into_iter().map(|hit| hit.question_id).collect())
    }

    /// Full question record, body included.
    pub async fn question_detail(&self, question_id: u64) -> Result<Option<QuestionDetail>, SearchError> {
        let url = format!("{}/questions/{}", self.base_url, question_id);
        let envelope: ItemsEnvelope<QuestionDetail> = self.get_items(&url, &[]).await?;
        Ok(envelope.items.into_iter().next())
    }

    /// Body of the highest voted answer, if the question has any.
    pub async fn top_answer(&self, question_id: u64) -> Result<Option<String>, SearchError> {
        let url = format!("{}/questions/{}/answers", self.base_url, question_id);
        let envelope: ItemsEnvelope<AnswerItem> = self
            .get_items(&url, &[("order", "desc"), ("sort", "votes")])
            .await?;
        Ok(envelope.items.into_iter().next().and_then(|answer| answer.body))
    }

    async fn get_items<T>(&self, url: &str, extra: &[(&str, &str)]) -> Result<ItemsEnvelope<T>, SearchError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .get(url)
            .query(extra)
            .query(&[("site", self.site.as_str()), ("filter", BODY_FILTER)])
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

        response.json().await.map_err(|e| SearchError::ParseError {
            provider: PROVIDER,
            message: e.to_string(),
        })
    }

    /// Fetch details for every id, keeping order. Failed lookups are dropped.
    async fn details_for(&self, ids: Vec<u64>) -> Vec<QuestionDetail> {
        let fetched: Vec<(u64, Result<Option<QuestionDetail>, SearchError>)> = stream::iter(ids)
            .map(|id| async move { (id, self.question_detail(id).await) })
            .buffered(self.detail_concurrency)
            .collect()
            .await;

        fetched
            .into_iter()
            .filter_map(|(id, outcome)| match outcome {
                Ok(Some(detail)) => Some(detail),
                Ok(None) => {
                    warn!(question_id = id, "Question detail came back empty, skipping");
                    None
                }
                Err(e) => {
                    warn!(question_id = id, error = %e, "Question detail lookup failed, skipping");
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl SearchProvider for StackExchangeClient {
    fn source(&self) -> Source {
        Source::StackOverflow
    }

    async fn search(&self, query: &str, sort: SortOrder) -> Result<Vec<SearchResult>, SearchError> {
        info!(query = %query, sort = %sort, site = %self.site, "Searching Stack Exchange");

        let ids = self.search_ids(query, sort).await?;
        debug!(hits = ids.len(), "Title search returned");

        let results: Vec<SearchResult> = self
            .details_for(ids)
            .await
            .into_iter()
            .map(|detail| detail.into_result(&self.site))
            .collect();

        info!(count = results.len(), "Stack Exchange search completed");
        Ok(results)
    }
}

/// Decode the HTML entities Stack Exchange leaves in titles and names.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let decoded = tail.find(';').filter(|&end| end <= 10).and_then(|end| {
            let entity = &tail[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                _ => {
                    let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                        u32::from_str_radix(hex, 16).ok()
                    } else {
                        entity.strip_prefix('#').and_then(|dec| dec.parse::<u32>().ok())
                    };
                    code.and_then(char::from_u32)
                }
            };
            ch.map(|c| (c, end))
        });

        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(base_url: &str) -> StackExchangeClient {
        StackExchangeClient::new(
            Client::new(),
            &StackExchangeConfig {
                api_url: base_url.to_string(),
                site: "stackoverflow".to_string(),
                page_size: 10,
                detail_concurrency: 3,
            },
        )
    }

    fn detail_body(id: u64, title: &str) -> String {
        serde_json::json!({
            "items": [{
                "question_id": id,
                "title": title,
                "tags": ["recursion", "python"],
                "owner": { "display_name": "Ada", "link": "https://stackoverflow.com/users/1/ada" },
                "link": format!("https://stackoverflow.com/questions/{}", id),
                "body": "<p>Question body</p>",
                "score": 7
            }]
        })
        .to_string()
    }

    #[test]
    fn test_decode_entities() {
        assert_eq!(decode_entities("What&#39;s a &quot;closure&quot;?"), "What's a \"closure\"?");
        assert_eq!(decode_entities("a &amp;&amp; b &lt; c"), "a && b < c");
        assert_eq!(decode_entities("&#x41;BC"), "ABC");
        assert_eq!(decode_entities("AT&T rocks"), "AT&T rocks");
        assert_eq!(decode_entities("no entities"), "no entities");
    }

    #[test]
    fn test_into_result_fills_attribution() {
        let detail = QuestionDetail {
            question_id: 42,
            title: "Why &#39;recursion&#39;?".to_string(),
            tags: vec![],
            owner: None,
            link: "https://stackoverflow.com/questions/42".to_string(),
            body: None,
            score: 0,
        };

        let result = detail.into_result("stackoverflow");
        assert_eq!(result.source, Source::StackOverflow);
        assert_eq!(result.title, "Why 'recursion'?");
        assert_eq!(result.author, "anonymous");
        assert_eq!(result.community_label, "stackoverflow");
        assert_eq!(result.question_id, Some(42));
    }

    #[tokio::test]
    async fn test_search_passes_sort_and_site() {
        let mut server = mockito::Server::new_async().await;

        let search = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("intitle".into(), "recursion".into()),
                Matcher::UrlEncoded("sort".into(), "votes".into()),
                Matcher::UrlEncoded("site".into(), "stackoverflow".into()),
                Matcher::UrlEncoded("order".into(), "desc".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"question_id":1}]}"#)
            .create_async()
            .await;

        let detail = server
            .mock("GET", "/questions/1")
            .match_query(Matcher::UrlEncoded("filter".into(), BODY_FILTER.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(detail_body(1, "Understanding recursion"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let results = client.search("recursion", SortOrder::Votes).await.unwrap();

        search.assert_async().await;
        detail.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Understanding recursion");
        assert_eq!(results[0].tags, vec!["recursion", "python"]);
        assert_eq!(results[0].author_url.as_deref(), Some("https://stackoverflow.com/users/1/ada"));
    }

    #[tokio::test]
    async fn test_failed_detail_is_skipped() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"question_id":1},{"question_id":2},{"question_id":3}]}"#)
            .create_async()
            .await;

        for (id, title) in [(1, "First"), (3, "Third")] {
            server
                .mock("GET", format!("/questions/{}", id).as_str())
                .match_query(Matcher::Any)
                .with_status(200)
                .with_header("content-type", "application/json")
                .with_body(detail_body(id, title))
                .create_async()
                .await;
        }

        server
            .mock("GET", "/questions/2")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let results = client.search("recursion", SortOrder::Activity).await.unwrap();

        let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Third"]);
    }

    #[tokio::test]
    async fn test_empty_detail_is_skipped() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"question_id":1},{"question_id":2}]}"#)
            .create_async()
            .await;

        server
            .mock("GET", "/questions/1")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;

        server
            .mock("GET", "/questions/2")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(detail_body(2, "Second"))
            .create_async()
            .await;

        let client = client_for(&server.url());
        let results = client.search("recursion", SortOrder::Activity).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].question_id, Some(2));
    }

    #[tokio::test]
    async fn test_search_failure_is_upstream_error() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(502)
            .create_async()
            .await;

        let client = client_for(&server.url());
        let err = client.search("recursion", SortOrder::Activity).await.unwrap_err();
        assert!(matches!(err, SearchError::Status { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_top_answer() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/questions/7/answers")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sort".into(), "votes".into()),
                Matcher::UrlEncoded("filter".into(), BODY_FILTER.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[{"body":"<p>Use a base case.</p>"},{"body":"<p>Second</p>"}]}"#)
            .create_async()
            .await;

        server
            .mock("GET", "/questions/8/answers")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;

        let client = client_for(&server.url());
        assert_eq!(
            client.top_answer(7).await.unwrap().as_deref(),
            Some("<p>Use a base case.</p>")
        );
        assert_eq!(client.top_answer(8).await.unwrap(), None);
    }
}
