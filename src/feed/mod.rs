//! Feed aggregation module for Dewdrop.
//!
//! This module provides RSS/Atom feed fetching, parsing, and
//! multi-feed collection.

pub mod aggregator;
pub mod fetcher;
pub mod types;

pub use aggregator::{posts_from_feed, AggregateResult, FeedAggregator, FeedFailure};
pub use fetcher::{parse_feed, validate_url, FeedFetcher};
pub use types::{
    BlogPost, ParsedFeed, ParsedItem, DEFAULT_MAX_FEED_SIZE, DEFAULT_MAX_ITEMS_PER_FEED,
    MAX_DESCRIPTION_LENGTH,
};
