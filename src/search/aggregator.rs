use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use super::provider::SearchProvider;
use super::types::{SearchError, SearchResult, SortOrder};

/// Results of one query, grouped by provider
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedResults {
    pub stack_overflow: Vec<SearchResult>,
    pub reddit: Vec<SearchResult>,
}

/// Fans a query out to both providers and fans the answers back in.
/// Either provider failing fails the whole search.
#[derive(Clone)]
pub struct Aggregator {
    qa: Arc<dyn SearchProvider>,
    social: Arc<dyn SearchProvider>,
}

impl Aggregator {
    pub fn new(qa: Arc<dyn SearchProvider>, social: Arc<dyn SearchProvider>) -> Self {
        Self { qa, social }
    }

    pub async fn search(&self, query: &str, sort: SortOrder) -> Result<AggregatedResults, SearchError> {
        debug!(qa = %self.qa.source(), social = %self.social.source(), "Fanning out search");

        let (stack_overflow, reddit) = tokio::try_join!(
            self.qa.search(query, sort),
            self.social.search(query, sort),
        )?;

        info!(
            query = %query,
            stack_overflow = stack_overflow.len(),
            reddit = reddit.len(),
            "Aggregated search completed"
        );

        Ok(AggregatedResults { stack_overflow, reddit })
    }
}
