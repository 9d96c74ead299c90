//! Content fingerprinting for exported digests.
//!
//! A digest's content id is derived from its publish date and a hash
//! of its posts' titles, links, and authors. Identical post sets in
//! identical order on the same date always produce the same id.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::feed::BlogPost;

/// Fixed prefix for content ids.
pub const CONTENT_ID_PREFIX: &str = "dewdrop";

/// Number of hex characters taken from the content hash.
pub const HASH_LENGTH: usize = 8;

// Unit separator, not expected inside titles, links, or authors.
const FIELD_DELIMITER: char = '\x1f';

/// Compute the content id for a digest.
///
/// Format: `dewdrop-YYYY-MM-DD-xxxxxxxx` where the date is the UTC
/// calendar date and the suffix is the first 8 hex characters of a
/// SHA-256 over the posts' titles, links, and authors in post order.
pub fn content_id(date: &DateTime<Utc>, posts: &[BlogPost]) -> String {
    format!(
        "{}-{}-{}",
        CONTENT_ID_PREFIX,
        date.format("%Y-%m-%d"),
        content_hash(posts)
    )
}

/// Compute the 8-hex-character content hash of a post list.
pub fn content_hash(posts: &[BlogPost]) -> String {
    let mut hasher = Sha256::new();
    for post in posts {
        hasher.update(post.title.as_bytes());
        hasher.update([FIELD_DELIMITER as u8]);
        hasher.update(post.link.as_deref().unwrap_or("").as_bytes());
        hasher.update([FIELD_DELIMITER as u8]);
        hasher.update(post.author.as_deref().unwrap_or("").as_bytes());
        hasher.update([FIELD_DELIMITER as u8]);
    }
    let digest = hasher.finalize();
    digest
        .iter()
        .take(HASH_LENGTH / 2)
        .map(|b| format!("{:02x}", b))
        .collect()
}
