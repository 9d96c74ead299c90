//! Integration tests for the publication tracking lifecycle:
//! export as draft, publish, record the result in the file.

use chrono::{TimeZone, Utc};

use dewdrop::categorize::RuleSet;
use dewdrop::config::ExportConfig;
use dewdrop::digest::{self, is_published, record_published, MetadataUpdate, PublicationStatus};
use dewdrop::export::{build_digest, write_digest, ExportFormat};
use dewdrop::feed::BlogPost;
use dewdrop::state::DigestState;

fn export_sample(dir: &std::path::Path, sequence: u64) -> std::path::PathBuf {
    let posts = vec![BlogPost::new("Building React Apps with TypeScript")
        .with_link("https://x/a")
        .with_author("J")];
    let date = Utc.with_ymd_and_hms(2025, 9, 28, 0, 0, 0).unwrap();
    let digest = build_digest(
        posts,
        &RuleSet::builtin(),
        &ExportConfig::default(),
        sequence,
        date,
    );
    write_digest(
        &digest,
        ExportFormat::Markdown,
        dir.to_str().unwrap(),
        "UTC",
    )
    .unwrap()
}

#[test]
fn publish_lifecycle_draft_to_published() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_sample(dir.path(), 1);

    // Freshly exported digests are drafts
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!is_published(&content));
    let draft = digest::parse(&content).unwrap();
    assert_eq!(draft.status, PublicationStatus::Draft);
    assert!(draft.published_date.is_none());
    assert!(draft.wordpress_post_id.is_none());

    // Record a successful publish
    record_published(&path, 4321).unwrap();

    let published = std::fs::read_to_string(&path).unwrap();
    assert!(is_published(&published));
    let meta = digest::parse(&published).unwrap();
    assert_eq!(meta.status, PublicationStatus::Published);
    assert_eq!(meta.wordpress_post_id, Some(4321));
    assert!(meta.published_date.is_some());
    // The content id assigned at export survives publishing
    assert_eq!(meta.content_id, draft.content_id);
    assert!(meta.last_modified >= draft.last_modified);
}

#[test]
fn publish_does_not_disturb_digest_body() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_sample(dir.path(), 1);
    let before = std::fs::read_to_string(&path).unwrap();

    record_published(&path, 99).unwrap();

    let after = std::fs::read_to_string(&path).unwrap();
    // Everything except the marker line is untouched
    let strip = |s: &str| {
        s.lines()
            .filter(|l| !l.starts_with(digest::METADATA_PREFIX))
            .collect::<Vec<_>>()
            .join("\n")
    };
    assert_eq!(strip(&before), strip(&after));
    // Still exactly one marker
    assert_eq!(after.matches(digest::METADATA_PREFIX).count(), 1);
}

#[test]
fn files_without_metadata_are_never_published() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("manual.md");
    std::fs::write(&path, "# A digest made by hand\n\n- some link\n").unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(!is_published(&content));

    // Publishing a manual file inserts a fresh record
    record_published(&path, 7).unwrap();
    let updated = std::fs::read_to_string(&path).unwrap();
    assert!(is_published(&updated));
    assert!(updated.contains("# A digest made by hand"));
}

#[test]
fn repeated_update_is_idempotent_except_last_modified() {
    let dir = tempfile::tempdir().unwrap();
    let path = export_sample(dir.path(), 1);

    record_published(&path, 55).unwrap();
    let first = digest::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();

    // Second update with identical fields
    let content = std::fs::read_to_string(&path).unwrap();
    let updated = digest::update(
        &content,
        &MetadataUpdate {
            status: Some(PublicationStatus::Published),
            wordpress_post_id: Some(55),
            published_date: first.published_date,
            ..MetadataUpdate::default()
        },
    );
    let second = digest::parse(&updated).unwrap();

    assert_eq!(first.content_id, second.content_id);
    assert_eq!(first.status, second.status);
    assert_eq!(first.wordpress_post_id, second.wordpress_post_id);
    assert_eq!(first.published_date, second.published_date);
}

#[test]
fn sequence_state_advances_across_exports() {
    let dir = tempfile::tempdir().unwrap();
    let state = DigestState::new(dir.path().join("state.json"), 4500);

    let first = state.next_sequence();
    assert_eq!(first, 4500);
    export_sample(dir.path(), first);
    state.advance(first).unwrap();

    let second = state.next_sequence();
    assert_eq!(second, 4501);
}
