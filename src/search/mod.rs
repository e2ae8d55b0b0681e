//! Search Module
//!
//! Queries two independent providers and normalizes what they return:
//! - Stack Exchange (Q&A) - title search plus per-question detail lookups
//! - Reddit (social) - OAuth search listing
//!
//! Both adapters implement [`SearchProvider`]; the [`Aggregator`] runs them
//! side by side.

pub mod aggregator;
pub mod provider;
pub mod reddit;
pub mod stackexchange;
pub mod types;

pub use aggregator::{AggregatedResults, Aggregator};
pub use provider::SearchProvider;
pub use reddit::RedditClient;
pub use stackexchange::StackExchangeClient;
pub use types::{SearchError, SearchResult, SortOrder, Source, UnknownSort};
