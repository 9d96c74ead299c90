//! Multi-feed aggregation.
//!
//! Collects posts from all configured feeds sequentially. One feed
//! failing does not abort the remaining feeds.

use tracing::{debug, info, warn};

use crate::config::FeedsConfig;
use crate::feed::fetcher::FeedFetcher;
use crate::feed::types::{BlogPost, ParsedFeed};
use crate::Result;

/// A feed that could not be fetched or parsed.
#[derive(Debug, Clone)]
pub struct FeedFailure {
    /// Feed URL.
    pub url: String,
    /// Error message.
    pub error: String,
}

/// Result of aggregating all configured feeds.
#[derive(Debug, Default)]
pub struct AggregateResult {
    /// Collected posts, in feed order then item order.
    pub posts: Vec<BlogPost>,
    /// Feeds that failed.
    pub failures: Vec<FeedFailure>,
}

/// Aggregates posts across configured feeds.
pub struct FeedAggregator<'a> {
    config: &'a FeedsConfig,
    fetcher: FeedFetcher,
}

impl<'a> FeedAggregator<'a> {
    /// Create a new aggregator for the given feed configuration.
    pub fn new(config: &'a FeedsConfig) -> Result<Self> {
        let fetcher = FeedFetcher::new(config)?;
        Ok(Self { config, fetcher })
    }

    /// Fetch every configured feed and collect its posts.
    ///
    /// Feeds are fetched sequentially in configuration order. A failed
    /// feed is recorded in the result and logged, and processing
    /// continues with the next feed.
    pub async fn collect(&self) -> AggregateResult {
        let mut result = AggregateResult::default();

        if self.config.urls.is_empty() {
            warn!("No feeds configured");
            return result;
        }

        info!("Fetching {} feed(s)", self.config.urls.len());

        for url in &self.config.urls {
            debug!("Fetching feed: {}", url);
            match self.fetcher.fetch(url).await {
                Ok(parsed) => {
                    let posts = posts_from_feed(parsed, self.config.max_items_per_feed);
                    debug!("Feed {} yielded {} post(s)", url, posts.len());
                    result.posts.extend(posts);
                }
                Err(e) => {
                    warn!("Failed to fetch feed {}: {}", url, e);
                    result.failures.push(FeedFailure {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        info!(
            "Collected {} post(s) from {} feed(s), {} failure(s)",
            result.posts.len(),
            self.config.urls.len() - result.failures.len(),
            result.failures.len()
        );

        result
    }
}

/// Convert a parsed feed into posts attributed to the feed title,
/// capped at `max_items`.
pub fn posts_from_feed(feed: ParsedFeed, max_items: usize) -> Vec<BlogPost> {
    let source = feed.title;
    feed.items
        .into_iter()
        .take(max_items)
        .map(|item| item.into_post(&source))
        .collect()
}
