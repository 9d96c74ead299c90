//! Digest export.
//!
//! Assembles categorized posts into a digest and renders it as HTML or
//! Markdown with embedded publication metadata.

pub mod html;
pub mod markdown;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::categorize::RuleSet;
use crate::config::ExportConfig;
use crate::datetime::format_digest_date;
use crate::digest::{content_id, embed, PublicationMetadata};
use crate::error::{DewdropError, Result};
use crate::feed::BlogPost;

/// Target export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// HTML document.
    Html,
    /// Markdown document.
    Markdown,
}

impl ExportFormat {
    /// Parse a format name.
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(DewdropError::Validation(format!(
                "unknown export format: {other} (expected html or markdown)"
            ))),
        }
    }

    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }
}

/// One category section of a digest.
#[derive(Debug, Clone)]
pub struct DigestSection {
    /// Category label.
    pub category: String,
    /// Posts in the section, in collection order.
    pub posts: Vec<BlogPost>,
}

/// A fully assembled digest, ready to render.
#[derive(Debug, Clone)]
pub struct Digest {
    /// Generated title.
    pub title: String,
    /// Digest date.
    pub date: DateTime<Utc>,
    /// Sequence number.
    pub sequence: u64,
    /// Non-empty category sections, in rule order.
    pub sections: Vec<DigestSection>,
    /// Content fingerprint over the final post list.
    pub content_id: String,
}

impl Digest {
    /// Total number of posts across all sections.
    pub fn post_count(&self) -> usize {
        self.sections.iter().map(|s| s.posts.len()).sum()
    }
}

/// Assemble a digest from collected posts.
///
/// Posts are deduplicated by normalized link, categorized, and grouped
/// by category in rule order (default category last). The content id
/// is computed over the final ordered post list.
pub fn build_digest(
    posts: Vec<BlogPost>,
    rules: &RuleSet,
    config: &ExportConfig,
    sequence: u64,
    date: DateTime<Utc>,
) -> Digest {
    let deduped = dedup_posts(posts);
    debug!("Building digest from {} post(s) after dedup", deduped.len());

    let categorized: Vec<BlogPost> = deduped
        .into_iter()
        .map(|post| {
            let category = rules.categorize(&post);
            post.with_category(category)
        })
        .collect();

    let mut sections = Vec::new();
    for category in rules.category_order() {
        let posts: Vec<BlogPost> = categorized
            .iter()
            .filter(|p| p.category.as_deref() == Some(category.as_str()))
            .cloned()
            .collect();
        if !posts.is_empty() {
            sections.push(DigestSection { category, posts });
        }
    }

    let ordered: Vec<BlogPost> = sections
        .iter()
        .flat_map(|s| s.posts.iter().cloned())
        .collect();
    let content_id = content_id(&date, &ordered);

    let title = format!(
        "{} \u{2013} {} (#{})",
        config.title_prefix,
        format_digest_date(&date, &config.timezone),
        sequence
    );

    Digest {
        title,
        date,
        sequence,
        sections,
        content_id,
    }
}

/// Render a digest in the given format, with a fresh draft metadata
/// record embedded.
pub fn render_digest(digest: &Digest, format: ExportFormat) -> String {
    let body = match format {
        ExportFormat::Html => html::render(digest),
        ExportFormat::Markdown => markdown::render(digest),
    };
    embed(&body, &PublicationMetadata::draft(digest.content_id.clone()))
}

/// Render a digest and write it to the output directory.
///
/// Returns the path of the written file.
pub fn write_digest(
    digest: &Digest,
    format: ExportFormat,
    output_dir: &str,
    timezone: &str,
) -> Result<PathBuf> {
    let content = render_digest(digest, format);

    let dir = Path::new(output_dir);
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let filename = format!(
        "dew-drop-{}-{}.{}",
        crate::datetime::digest_date_key(&digest.date, timezone),
        digest.sequence,
        format.extension()
    );
    let path = dir.join(filename);
    fs::write(&path, content)?;
    Ok(path)
}

/// Recover a digest's title from rendered content.
///
/// Looks for an HTML `<title>` element first, then a Markdown level-1
/// heading. Escapes applied at render time are reversed.
pub fn extract_title(content: &str) -> Option<String> {
    if let Some(start) = content.find("<title>") {
        let rest = &content[start + "<title>".len()..];
        if let Some(end) = rest.find("</title>") {
            return Some(html::unescape_html(rest[..end].trim()));
        }
    }
    for line in content.lines() {
        if let Some(heading) = line.trim().strip_prefix("# ") {
            return Some(markdown::unescape_markdown(heading.trim()));
        }
    }
    None
}

/// Collapse posts sharing the same normalized link to one entry.
///
/// Links are compared case-insensitively with trailing slashes
/// stripped; the first occurrence wins. Posts without a link are
/// always kept.
pub fn dedup_posts(posts: Vec<BlogPost>) -> Vec<BlogPost> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::with_capacity(posts.len());
    for post in posts {
        match post.link.as_deref() {
            Some(link) => {
                if seen.insert(normalize_link(link)) {
                    result.push(post);
                }
            }
            None => result.push(post),
        }
    }
    result
}

/// Normalize a link for deduplication.
fn normalize_link(link: &str) -> String {
    link.trim().trim_end_matches('/').to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> ExportConfig {
        ExportConfig::default()
    }

    fn date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 28, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_export_format_from_name() {
        assert_eq!(ExportFormat::from_name("html").unwrap(), ExportFormat::Html);
        assert_eq!(ExportFormat::from_name("HTML").unwrap(), ExportFormat::Html);
        assert_eq!(
            ExportFormat::from_name("markdown").unwrap(),
            ExportFormat::Markdown
        );
        assert_eq!(ExportFormat::from_name("md").unwrap(), ExportFormat::Markdown);
        assert!(ExportFormat::from_name("pdf").is_err());
    }

    #[test]
    fn test_normalize_link() {
        assert_eq!(normalize_link("https://X/a/"), "https://x/a");
        assert_eq!(normalize_link("https://x/a"), "https://x/a");
        assert_eq!(normalize_link(" https://x/a// "), "https://x/a");
    }

    #[test]
    fn test_dedup_posts_trailing_slash() {
        let posts = vec![
            BlogPost::new("First").with_link("https://x/a"),
            BlogPost::new("Duplicate").with_link("https://x/a/"),
            BlogPost::new("Other").with_link("https://x/b"),
        ];
        let deduped = dedup_posts(posts);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "First");
        assert_eq!(deduped[1].title, "Other");
    }

    #[test]
    fn test_dedup_posts_case_insensitive() {
        let posts = vec![
            BlogPost::new("First").with_link("https://x/Article"),
            BlogPost::new("Second").with_link("https://x/article"),
        ];
        assert_eq!(dedup_posts(posts).len(), 1);
    }

    #[test]
    fn test_dedup_posts_keeps_linkless() {
        let posts = vec![
            BlogPost::new("No link one"),
            BlogPost::new("No link two"),
        ];
        assert_eq!(dedup_posts(posts).len(), 2);
    }

    #[test]
    fn test_build_digest_title_and_id() {
        let posts = vec![BlogPost::new("Building React Apps with TypeScript")
            .with_link("https://x/a")
            .with_author("J")];
        let rules = RuleSet::builtin();
        let digest = build_digest(posts, &rules, &config(), 4500, date());

        assert_eq!(digest.title, "Dew Drop \u{2013} September 28, 2025 (#4500)");
        assert!(digest.content_id.starts_with("dewdrop-2025-09-28-"));
        let hash = digest.content_id.rsplit('-').next().unwrap();
        assert_eq!(hash.len(), 8);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_build_digest_groups_by_category() {
        let posts = vec![
            BlogPost::new("Advanced CSS layouts").with_link("https://x/css"),
            BlogPost::new("Nothing in particular").with_link("https://x/misc"),
            BlogPost::new("React hooks deep dive").with_link("https://x/react"),
        ];
        let rules = RuleSet::builtin();
        let digest = build_digest(posts, &rules, &config(), 1, date());

        assert_eq!(digest.sections.len(), 2);
        assert_eq!(digest.sections[0].category, "Web Development");
        assert_eq!(digest.sections[0].posts.len(), 2);
        assert_eq!(digest.sections[1].category, "Miscellaneous");
        assert_eq!(digest.sections[1].posts.len(), 1);
        assert_eq!(digest.post_count(), 3);
    }

    #[test]
    fn test_build_digest_skips_empty_sections() {
        let posts = vec![BlogPost::new("Plain post").with_link("https://x/p")];
        let rules = RuleSet::builtin();
        let digest = build_digest(posts, &rules, &config(), 1, date());
        assert_eq!(digest.sections.len(), 1);
        assert_eq!(digest.sections[0].category, "Miscellaneous");
    }

    #[test]
    fn test_build_digest_dedups_before_grouping() {
        let posts = vec![
            BlogPost::new("One").with_link("https://x/a"),
            BlogPost::new("One again").with_link("https://x/a/"),
        ];
        let rules = RuleSet::builtin();
        let digest = build_digest(posts, &rules, &config(), 1, date());
        assert_eq!(digest.post_count(), 1);
    }

    #[test]
    fn test_render_digest_embeds_draft_metadata() {
        let posts = vec![BlogPost::new("Post").with_link("https://x/a")];
        let rules = RuleSet::builtin();
        let digest = build_digest(posts, &rules, &config(), 1, date());

        for format in [ExportFormat::Html, ExportFormat::Markdown] {
            let rendered = render_digest(&digest, format);
            let meta = crate::digest::parse(&rendered).unwrap();
            assert_eq!(meta.content_id, digest.content_id);
            assert_eq!(meta.status, crate::digest::PublicationStatus::Draft);
        }
    }

    #[test]
    fn test_extract_title_html() {
        let posts = vec![BlogPost::new("Post").with_link("https://x/a")];
        let rules = RuleSet::builtin();
        let digest = build_digest(posts, &rules, &config(), 7, date());
        let rendered = render_digest(&digest, ExportFormat::Html);
        assert_eq!(extract_title(&rendered), Some(digest.title.clone()));
    }

    #[test]
    fn test_extract_title_markdown() {
        let posts = vec![BlogPost::new("Post").with_link("https://x/a")];
        let rules = RuleSet::builtin();
        let digest = build_digest(posts, &rules, &config(), 7, date());
        let rendered = render_digest(&digest, ExportFormat::Markdown);
        assert_eq!(extract_title(&rendered), Some(digest.title.clone()));
    }

    #[test]
    fn test_extract_title_none() {
        assert_eq!(extract_title("no headings here\n"), None);
    }

    #[test]
    fn test_write_digest() {
        let dir = tempfile::tempdir().unwrap();
        let posts = vec![BlogPost::new("Post").with_link("https://x/a")];
        let rules = RuleSet::builtin();
        let digest = build_digest(posts, &rules, &config(), 42, date());

        let out = dir.path().join("digests");
        let path = write_digest(
            &digest,
            ExportFormat::Markdown,
            out.to_str().unwrap(),
            "UTC",
        )
        .unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "dew-drop-2025-09-28-42.md"
        );
        let content = fs::read_to_string(&path).unwrap();
        assert!(crate::digest::parse(&content).is_some());
    }
}
