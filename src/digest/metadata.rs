//! Publication metadata embedded in exported digests.
//!
//! A digest artifact carries its own publication record as a one-line
//! comment, so files stay self-describing and portable:
//!
//! `<!-- PUBLICATION_METADATA: {"contentId":"...","status":"draft",...} -->`
//!
//! The marker goes immediately after the first opening `<body>` tag in
//! HTML content, or on the very first line otherwise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Marker line prefix.
pub const METADATA_PREFIX: &str = "<!-- PUBLICATION_METADATA: ";

/// Marker line suffix.
pub const METADATA_SUFFIX: &str = " -->";

/// Publication lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationStatus {
    /// Exported but not yet published.
    Draft,
    /// Published to WordPress.
    Published,
}

/// Publication record for one exported digest.
///
/// `published_date` and `wordpress_post_id` are both absent until the
/// digest is published, then both present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicationMetadata {
    /// Content snapshot identifier (`dewdrop-YYYY-MM-DD-xxxxxxxx`).
    pub content_id: String,
    /// Publication status.
    pub status: PublicationStatus,
    /// Timestamp of the most recent metadata write.
    pub last_modified: DateTime<Utc>,
    /// When the digest was published.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<DateTime<Utc>>,
    /// Remote post identifier returned by the publish call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordpress_post_id: Option<u64>,
}

impl PublicationMetadata {
    /// Create a fresh draft record for the given content id.
    pub fn draft(content_id: impl Into<String>) -> Self {
        Self {
            content_id: content_id.into(),
            status: PublicationStatus::Draft,
            last_modified: Utc::now(),
            published_date: None,
            wordpress_post_id: None,
        }
    }
}

/// Partial metadata fields merged by [`update`].
#[derive(Debug, Clone, Default)]
pub struct MetadataUpdate {
    /// New content id.
    pub content_id: Option<String>,
    /// New status.
    pub status: Option<PublicationStatus>,
    /// New published date.
    pub published_date: Option<DateTime<Utc>>,
    /// New remote post id.
    pub wordpress_post_id: Option<u64>,
}

impl MetadataUpdate {
    /// Fields recorded after a successful publish.
    pub fn published(post_id: u64) -> Self {
        Self {
            content_id: None,
            status: Some(PublicationStatus::Published),
            published_date: Some(Utc::now()),
            wordpress_post_id: Some(post_id),
        }
    }
}

/// Render the metadata marker line.
pub fn encode_line(meta: &PublicationMetadata) -> String {
    // Compact JSON keeps the marker on one line
    let json = serde_json::to_string(meta).expect("metadata serialization cannot fail");
    format!("{METADATA_PREFIX}{json}{METADATA_SUFFIX}")
}

/// Embed a metadata record in content.
///
/// HTML content gets the marker right after the first opening `<body>`
/// tag; content without one gets it as the first line.
pub fn embed(content: &str, meta: &PublicationMetadata) -> String {
    let line = encode_line(meta);
    match body_tag_end(content) {
        Some(pos) => {
            let mut result = String::with_capacity(content.len() + line.len() + 1);
            result.push_str(&content[..pos]);
            result.push('\n');
            result.push_str(&line);
            result.push_str(&content[pos..]);
            result
        }
        None => format!("{line}\n{content}"),
    }
}

/// Extract the embedded metadata record, if any.
///
/// Returns `None` when no marker is present. A marker with malformed
/// JSON is logged and treated as absent.
pub fn parse(content: &str) -> Option<PublicationMetadata> {
    let payload = find_marker(content)?.1;
    match serde_json::from_str(payload) {
        Ok(meta) => Some(meta),
        Err(e) => {
            warn!("Malformed publication metadata ignored: {}", e);
            None
        }
    }
}

/// Merge partial fields into the embedded record and return the
/// updated content.
///
/// Starts from the existing record, or an empty draft when the marker
/// is absent or malformed. `last_modified` is always refreshed. The
/// existing marker line is replaced in place; if there is none, a new
/// marker is inserted using the same placement rule as [`embed`].
pub fn update(content: &str, fields: &MetadataUpdate) -> String {
    let mut meta = parse(content).unwrap_or_else(|| PublicationMetadata::draft(""));

    if let Some(content_id) = &fields.content_id {
        meta.content_id = content_id.clone();
    }
    if let Some(status) = fields.status {
        meta.status = status;
    }
    if let Some(published_date) = fields.published_date {
        meta.published_date = Some(published_date);
    }
    if let Some(post_id) = fields.wordpress_post_id {
        meta.wordpress_post_id = Some(post_id);
    }
    meta.last_modified = Utc::now();

    match find_marker(content) {
        Some((line, _)) => content.replacen(line, &encode_line(&meta), 1),
        None => embed(content, &meta),
    }
}

/// Locate the marker line. Returns the full marker text and the JSON
/// payload between prefix and suffix.
fn find_marker(content: &str) -> Option<(&str, &str)> {
    for line in content.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(METADATA_PREFIX) {
            if let Some(payload) = rest.strip_suffix(METADATA_SUFFIX) {
                return Some((trimmed, payload));
            }
        }
    }
    None
}

/// Byte offset just past the first opening `<body...>` tag, if any.
fn body_tag_end(content: &str) -> Option<usize> {
    let bytes = content.as_bytes();
    let needle = b"<body";
    let start = bytes
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .filter(|&pos| {
            // Reject tags like <bodyguard>
            matches!(
                bytes.get(pos + needle.len()),
                Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r')
            )
        })?;
    let close = content[start..].find('>')?;
    Some(start + close + 1)
}
