//! Keyword-based post categorization.
//!
//! Posts are matched against an ordered list of category rules. Each
//! rule carries keyword lists for the post title, link, and author.
//! The first rule with any match wins; unmatched posts fall back to
//! the default category.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::feed::BlogPost;

/// Category used when the rule file names no default.
pub const BUILTIN_DEFAULT_CATEGORY: &str = "Miscellaneous";

/// One categorization rule.
#[derive(Debug, Clone)]
pub struct CategoryRule {
    /// Category label (e.g., "Web Development").
    pub name: String,
    /// Keywords matched against the lowercased title.
    pub title_keywords: Vec<String>,
    /// Keywords matched against the lowercased link.
    pub url_keywords: Vec<String>,
    /// Keywords matched against the lowercased author.
    pub author_keywords: Vec<String>,
}

/// Keyword lists for one category in the rule file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleKeywords {
    #[serde(default)]
    title_keywords: Vec<String>,
    #[serde(default)]
    url_keywords: Vec<String>,
    #[serde(default)]
    author_keywords: Vec<String>,
}

/// On-disk rule file layout.
///
/// `categories` is a JSON object whose declared order is the rule
/// evaluation order.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RuleFile {
    #[serde(default)]
    categories: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    default_category: Option<String>,
    #[serde(default)]
    whole_word_keywords: Vec<String>,
}

/// Immutable, ordered categorization rule set.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CategoryRule>,
    whole_word_keywords: HashSet<String>,
    default_category: String,
}

impl RuleSet {
    /// Build a rule set from parts. Keywords are lowercased.
    pub fn new(
        rules: Vec<CategoryRule>,
        whole_word_keywords: Vec<String>,
        default_category: impl Into<String>,
    ) -> Self {
        let rules = rules
            .into_iter()
            .map(|r| CategoryRule {
                name: r.name,
                title_keywords: lowercase_all(r.title_keywords),
                url_keywords: lowercase_all(r.url_keywords),
                author_keywords: lowercase_all(r.author_keywords),
            })
            .collect();
        Self {
            rules,
            whole_word_keywords: whole_word_keywords
                .into_iter()
                .map(|k| k.to_lowercase())
                .collect(),
            default_category: default_category.into(),
        }
    }

    /// Load rules from a JSON file.
    ///
    /// A missing or malformed file is logged and replaced with the
    /// built-in rule set.
    pub fn load<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(
                    "Failed to read rule file {}: {}; using built-in rules",
                    path.display(),
                    e
                );
                return Self::builtin();
            }
        };
        match Self::parse(&content) {
            Ok(rules) => rules,
            Err(e) => {
                warn!(
                    "Failed to parse rule file {}: {}; using built-in rules",
                    path.display(),
                    e
                );
                Self::builtin()
            }
        }
    }

    /// Parse rules from a JSON string.
    pub fn parse(s: &str) -> Result<Self, serde_json::Error> {
        let file: RuleFile = serde_json::from_str(s)?;

        let mut rules = Vec::with_capacity(file.categories.len());
        for (name, value) in file.categories {
            match serde_json::from_value::<RuleKeywords>(value) {
                Ok(keywords) => rules.push(CategoryRule {
                    name,
                    title_keywords: keywords.title_keywords,
                    url_keywords: keywords.url_keywords,
                    author_keywords: keywords.author_keywords,
                }),
                Err(e) => {
                    warn!("Skipping malformed category rule {:?}: {}", name, e);
                }
            }
        }

        let default_category = file
            .default_category
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| BUILTIN_DEFAULT_CATEGORY.to_string());

        Ok(Self::new(rules, file.whole_word_keywords, default_category))
    }

    /// The built-in rule set used when no rule file is configured.
    pub fn builtin() -> Self {
        let rules = vec![
            CategoryRule {
                name: "Web Development".to_string(),
                title_keywords: [
                    "react",
                    "angular",
                    "vue",
                    "javascript",
                    "typescript",
                    "css",
                    "html",
                    "blazor",
                    "asp.net",
                    "node.js",
                ]
                .map(String::from)
                .to_vec(),
                url_keywords: vec!["webdev".to_string(), "frontend".to_string()],
                author_keywords: vec![],
            },
            CategoryRule {
                name: "Mobile Development".to_string(),
                title_keywords: [
                    "android", "ios", "swift", "kotlin", "xamarin", "flutter", "maui",
                ]
                .map(String::from)
                .to_vec(),
                url_keywords: vec!["mobile".to_string()],
                author_keywords: vec![],
            },
            CategoryRule {
                name: "AI & Machine Learning".to_string(),
                title_keywords: [
                    "ai",
                    "machine learning",
                    "deep learning",
                    "llm",
                    "copilot",
                    "openai",
                ]
                .map(String::from)
                .to_vec(),
                url_keywords: vec![],
                author_keywords: vec![],
            },
            CategoryRule {
                name: "Cloud & DevOps".to_string(),
                title_keywords: [
                    "azure",
                    "aws",
                    "docker",
                    "kubernetes",
                    "terraform",
                    "devops",
                ]
                .map(String::from)
                .to_vec(),
                url_keywords: vec![],
                author_keywords: vec![],
            },
        ];
        // "ai" as a substring would match "air", "maintain", etc.
        let whole_word = vec!["ai".to_string(), "llm".to_string()];
        Self::new(rules, whole_word, BUILTIN_DEFAULT_CATEGORY)
    }

    /// The fallback category label.
    pub fn default_category(&self) -> &str {
        &self.default_category
    }

    /// Category labels in rule order, default category last.
    pub fn category_order(&self) -> Vec<String> {
        let mut order: Vec<String> = self.rules.iter().map(|r| r.name.clone()).collect();
        if !order.contains(&self.default_category) {
            order.push(self.default_category.clone());
        }
        order
    }

    /// Assign a category to a post.
    ///
    /// Rules are evaluated in declared order; the first rule with any
    /// keyword match wins. Always returns a label.
    pub fn categorize(&self, post: &BlogPost) -> String {
        let title = post.title.to_lowercase();
        let link = post
            .link
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();
        let author = post
            .author
            .as_deref()
            .map(str::to_lowercase)
            .unwrap_or_default();

        for rule in &self.rules {
            if self.matches_any(&rule.title_keywords, &title)
                || self.matches_any(&rule.url_keywords, &link)
                || self.matches_any(&rule.author_keywords, &author)
            {
                return rule.name.clone();
            }
        }

        self.default_category.clone()
    }

    fn matches_any(&self, keywords: &[String], text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        keywords.iter().any(|keyword| {
            if self.whole_word_keywords.contains(keyword) {
                contains_whole_word(text, keyword)
            } else {
                text.contains(keyword.as_str())
            }
        })
    }
}

/// Check if `word` occurs in `text` bounded by non-alphanumeric
/// characters (or the text edges) on both sides.
fn contains_whole_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let mut start = 0;
    while let Some(pos) = text[start..].find(word) {
        let begin = start + pos;
        let end = begin + word.len();

        let before_ok = text[..begin]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = text[end..].chars().next().map_or(true, |c| !c.is_alphanumeric());

        if before_ok && after_ok {
            return true;
        }

        // Advance past the first character of this occurrence
        let step = text[begin..].chars().next().map_or(1, |c| c.len_utf8());
        start = begin + step;
    }
    false
}

fn lowercase_all(keywords: Vec<String>) -> Vec<String> {
    keywords.into_iter().map(|k| k.to_lowercase()).collect()
}
