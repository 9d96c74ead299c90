//! Feed and post types for Dewdrop.

use chrono::{DateTime, Utc};

/// Maximum length for a post description.
pub const MAX_DESCRIPTION_LENGTH: usize = 10000;

/// Default maximum number of items taken per feed.
pub const DEFAULT_MAX_ITEMS_PER_FEED: usize = 25;

/// Default maximum feed size in bytes (5MB).
pub const DEFAULT_MAX_FEED_SIZE: u64 = 5 * 1024 * 1024;

/// A blog post collected from a feed.
#[derive(Debug, Clone)]
pub struct BlogPost {
    /// Post title.
    pub title: String,
    /// Link to the original article.
    pub link: Option<String>,
    /// Post description/summary (HTML tags stripped).
    pub description: Option<String>,
    /// When the post was published.
    pub published_at: Option<DateTime<Utc>>,
    /// Title of the feed the post came from.
    pub source: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// Assigned category label.
    pub category: Option<String>,
}

impl BlogPost {
    /// Create a new post with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: None,
            description: None,
            published_at: None,
            source: None,
            author: None,
            category: None,
        }
    }

    /// Set the link.
    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let desc = description.into();
        // Truncate if too long
        if desc.len() > MAX_DESCRIPTION_LENGTH {
            self.description = Some(desc.chars().take(MAX_DESCRIPTION_LENGTH).collect());
        } else {
            self.description = Some(desc);
        }
        self
    }

    /// Set the published date.
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    /// Set the source feed title.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the assigned category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Parsed feed data from external source.
#[derive(Debug, Clone)]
pub struct ParsedFeed {
    /// Feed title.
    pub title: String,
    /// Feed description.
    pub description: Option<String>,
    /// Site URL.
    pub site_url: Option<String>,
    /// Parsed items.
    pub items: Vec<ParsedItem>,
}

/// Parsed item data from external source.
#[derive(Debug, Clone)]
pub struct ParsedItem {
    /// Unique identifier (RSS guid or Atom id).
    pub guid: String,
    /// Item title.
    pub title: String,
    /// Link to the original article.
    pub link: Option<String>,
    /// Item description (HTML tags stripped).
    pub description: Option<String>,
    /// Author name.
    pub author: Option<String>,
    /// When the item was published.
    pub published_at: Option<DateTime<Utc>>,
}

impl ParsedItem {
    /// Convert into a blog post attributed to the given feed.
    pub fn into_post(self, source: &str) -> BlogPost {
        let mut post = BlogPost::new(self.title).with_source(source);
        if let Some(link) = self.link {
            post = post.with_link(link);
        }
        if let Some(desc) = self.description {
            post = post.with_description(desc);
        }
        if let Some(author) = self.author {
            post = post.with_author(author);
        }
        if let Some(published_at) = self.published_at {
            post = post.with_published_at(published_at);
        }
        post
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_blog_post() {
        let post = BlogPost::new("Test Article");
        assert_eq!(post.title, "Test Article");
        assert!(post.link.is_none());
        assert!(post.category.is_none());
    }

    #[test]
    fn test_blog_post_with_fields() {
        let now = Utc::now();
        let post = BlogPost::new("Test Article")
            .with_link("https://example.com/article")
            .with_description("Summary text")
            .with_author("Author Name")
            .with_source("Example Blog")
            .with_published_at(now)
            .with_category("Web Development");
        assert_eq!(post.link, Some("https://example.com/article".to_string()));
        assert_eq!(post.description, Some("Summary text".to_string()));
        assert_eq!(post.author, Some("Author Name".to_string()));
        assert_eq!(post.source, Some("Example Blog".to_string()));
        assert_eq!(post.published_at, Some(now));
        assert_eq!(post.category, Some("Web Development".to_string()));
    }

    #[test]
    fn test_blog_post_truncates_long_description() {
        let long_desc = "a".repeat(MAX_DESCRIPTION_LENGTH + 100);
        let post = BlogPost::new("Test").with_description(long_desc);
        assert_eq!(
            post.description.as_ref().unwrap().len(),
            MAX_DESCRIPTION_LENGTH
        );
    }

    #[test]
    fn test_parsed_item_into_post() {
        let now = Utc::now();
        let item = ParsedItem {
            guid: "guid-1".to_string(),
            title: "An Article".to_string(),
            link: Some("https://example.com/1".to_string()),
            description: Some("Summary".to_string()),
            author: Some("J. Author".to_string()),
            published_at: Some(now),
        };
        let post = item.into_post("Example Blog");
        assert_eq!(post.title, "An Article");
        assert_eq!(post.link, Some("https://example.com/1".to_string()));
        assert_eq!(post.source, Some("Example Blog".to_string()));
        assert_eq!(post.author, Some("J. Author".to_string()));
        assert_eq!(post.published_at, Some(now));
    }

    #[test]
    fn test_parsed_item_into_post_minimal() {
        let item = ParsedItem {
            guid: "guid-2".to_string(),
            title: "Bare".to_string(),
            link: None,
            description: None,
            author: None,
            published_at: None,
        };
        let post = item.into_post("Example Blog");
        assert_eq!(post.title, "Bare");
        assert!(post.link.is_none());
        assert!(post.author.is_none());
    }
}
