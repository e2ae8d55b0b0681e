use async_trait::async_trait;

use super::types::{SearchError, SearchResult, SortOrder, Source};

#[async_trait]
pub trait SearchProvider: Send + Sync {
    fn source(&self) -> Source;

    async fn search(&self, query: &str, sort: SortOrder) -> Result<Vec<SearchResult>, SearchError>;
}
