//! HTML digest rendering.

use crate::export::Digest;

/// Render a digest as a standalone HTML document.
///
/// All feed-supplied text is escaped.
pub fn render(digest: &Digest) -> String {
    let mut out = String::new();
    let title = escape_html(&digest.title);

    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{title}</title>\n"));
    out.push_str("</head>\n<body>\n");
    out.push_str(&format!("<h1>{title}</h1>\n"));

    for section in &digest.sections {
        out.push_str(&format!("<h2>{}</h2>\n<ul>\n", escape_html(&section.category)));
        for post in &section.posts {
            let text = escape_html(&post.title);
            let entry = match post.link.as_deref() {
                Some(link) => format!("<a href=\"{}\">{}</a>", escape_html(link), text),
                None => text,
            };
            let mut line = format!("<li>{entry}");
            if let Some(author) = post.author.as_deref().filter(|a| !a.is_empty()) {
                line.push_str(&format!(" \u{2013} {}", escape_html(author)));
            }
            if let Some(source) = post.source.as_deref().filter(|s| !s.is_empty()) {
                line.push_str(&format!(" ({})", escape_html(source)));
            }
            line.push_str("</li>\n");
            out.push_str(&line);
        }
        out.push_str("</ul>\n");
    }

    out.push_str("</body>\n</html>\n");
    out
}

/// Reverse [`escape_html`] on text known to come from it.
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Escape HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}
