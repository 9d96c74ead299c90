//! Publication tracking for exported digests.
//!
//! Sits between the export formatter and the WordPress publish action.
//! The duplicate-publish signal is advisory: the tracker reports it,
//! the caller decides whether to proceed.

use std::fs;
use std::path::Path;

use crate::digest::metadata::{self, MetadataUpdate, PublicationStatus};
use crate::Result;

/// Check whether content carries a published record.
///
/// Returns true iff a metadata marker is present and its status is
/// `published`. Content without a marker (exported before tracking
/// existed, or created by hand) is treated as never published.
pub fn is_published(content: &str) -> bool {
    matches!(
        metadata::parse(content),
        Some(meta) if meta.status == PublicationStatus::Published
    )
}

/// Read a digest file for publishing.
pub fn read_digest<P: AsRef<Path>>(path: P) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Record a successful publish in the digest file.
///
/// Merges the remote post id, publish timestamp, and `published`
/// status into the embedded record and writes the file back. The
/// caller reports a failure as a warning; the remote publish has
/// already happened and is not rolled back.
pub fn record_published<P: AsRef<Path>>(path: P, post_id: u64) -> Result<()> {
    let content = fs::read_to_string(path.as_ref())?;
    let updated = metadata::update(&content, &MetadataUpdate::published(post_id));
    fs::write(path.as_ref(), updated)?;
    Ok(())
}
