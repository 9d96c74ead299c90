//! Digest identity and publication tracking.
//!
//! Exported digests carry their own publication record embedded as a
//! comment, keyed by a content fingerprint.

pub mod fingerprint;
pub mod metadata;
pub mod tracker;

pub use fingerprint::{content_hash, content_id, CONTENT_ID_PREFIX, HASH_LENGTH};
pub use metadata::{
    embed, encode_line, parse, update, MetadataUpdate, PublicationMetadata, PublicationStatus,
    METADATA_PREFIX, METADATA_SUFFIX,
};
pub use tracker::{is_published, read_digest, record_published};
