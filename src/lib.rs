//! Dewdrop - Developer Blog Digest Curator
//!
//! Aggregates developer-blog RSS/Atom feeds, categorizes posts by
//! keyword rules, and exports curated digests (HTML/Markdown) for
//! publication to WordPress.

pub mod categorize;
pub mod config;
pub mod datetime;
pub mod digest;
pub mod error;
pub mod export;
pub mod feed;
pub mod logging;
pub mod state;
pub mod wordpress;

pub use categorize::{CategoryRule, RuleSet, BUILTIN_DEFAULT_CATEGORY};
pub use config::Config;
pub use digest::{
    content_id, is_published, record_published, MetadataUpdate, PublicationMetadata,
    PublicationStatus,
};
pub use error::{DewdropError, Result};
pub use export::{
    build_digest, extract_title, render_digest, write_digest, Digest, DigestSection, ExportFormat,
};
pub use feed::{BlogPost, FeedAggregator, FeedFetcher};
pub use state::DigestState;
pub use wordpress::{PostStatus, PublishedPost, WordPressClient};
