//! Normalized search records shared by both providers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised by the provider adapters
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("{provider} credentials not configured")]
    NotConfigured { provider: &'static str },

    #[error("{provider} request failed: {message}")]
    RequestFailed { provider: &'static str, message: String },

    #[error("{provider} returned HTTP {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("Failed to parse {provider} response: {message}")]
    ParseError { provider: &'static str, message: String },

    #[error("{provider} authentication failed: {message}")]
    Auth { provider: &'static str, message: String },
}

/// Which provider produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    StackOverflow,
    Reddit,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::StackOverflow => write!(f, "stackOverflow"),
            Source::Reddit => write!(f, "reddit"),
        }
    }
}

/// Provider-agnostic result record.
///
/// `title`, `url`, `author` and `community_label` are always populated so any
/// result can be rendered with a heading, a link and an attribution line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub source: Source,
    pub title: String,
    pub url: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_url: Option<String>,
    /// Site name for Q&A results, subreddit for social results
    pub community_label: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

/// Caller-facing sort vocabulary. Stack Exchange takes it verbatim, Reddit
/// gets the closest listing sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    #[default]
    Activity,
    Votes,
    Creation,
    Relevance,
}

#[derive(Debug, Error)]
#[error("Unknown sort order: {0}")]
pub struct UnknownSort(pub String);

impl SortOrder {
    pub fn as_stack_exchange(&self) -> &'static str {
        match self {
            SortOrder::Activity => "activity",
            SortOrder::Votes => "votes",
            SortOrder::Creation => "creation",
            SortOrder::Relevance => "relevance",
        }
    }

    pub fn as_reddit(&self) -> &'static str {
        match self {
            SortOrder::Activity | SortOrder::Relevance => "relevance",
            SortOrder::Votes => "top",
            SortOrder::Creation => "new",
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "activity" => Ok(SortOrder::Activity),
            "votes" => Ok(SortOrder::Votes),
            "creation" => Ok(SortOrder::Creation),
            "relevance" => Ok(SortOrder::Relevance),
            other => Err(UnknownSort(other.to_string())),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_stack_exchange())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_mapping() {
        assert_eq!("activity".parse::<SortOrder>().unwrap().as_reddit(), "relevance");
        assert_eq!("votes".parse::<SortOrder>().unwrap().as_reddit(), "top");
        assert_eq!("creation".parse::<SortOrder>().unwrap().as_reddit(), "new");
        assert_eq!("Relevance".parse::<SortOrder>().unwrap().as_stack_exchange(), "relevance");
        assert_eq!("".parse::<SortOrder>().unwrap(), SortOrder::Activity);
        assert!("hot".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_search_result_wire_shape() {
        let result = SearchResult {
            source: Source::Reddit,
            title: "Recursion explained".to_string(),
            url: "https://reddit.com/r/learnprogramming/comments/abc".to_string(),
            author: "someone".to_string(),
            author_url: None,
            community_label: "learnprogramming".to_string(),
            tags: vec![],
            body: None,
            question_id: None,
            score: Some(12),
        };

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["source"], "reddit");
        assert_eq!(value["communityLabel"], "learnprogramming");
        assert!(value.get("questionId").is_none());
    }

    #[test]
    fn test_search_result_accepts_minimal_payload() {
        let parsed: SearchResult = serde_json::from_value(serde_json::json!({
            "source": "stackOverflow",
            "title": "What is tail recursion?",
            "url": "https://stackoverflow.com/q/33923",
            "author": "Ben",
            "communityLabel": "stackoverflow"
        }))
        .unwrap();

        assert_eq!(parsed.source, Source::StackOverflow);
        assert!(parsed.tags.is_empty());
    }
}
