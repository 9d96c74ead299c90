//! Markdown digest rendering.

use crate::export::Digest;

/// Render a digest as a Markdown document.
///
/// Feed-supplied text is escaped so it cannot alter document
/// structure.
pub fn render(digest: &Digest) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n\n", escape_markdown(&digest.title)));

    for section in &digest.sections {
        out.push_str(&format!("## {}\n\n", escape_markdown(&section.category)));
        for post in &section.posts {
            let text = escape_markdown(&post.title);
            let entry = match post.link.as_deref() {
                Some(link) => format!("[{}]({})", text, sanitize_link(link)),
                None => text,
            };
            let mut line = format!("- {entry}");
            if let Some(author) = post.author.as_deref().filter(|a| !a.is_empty()) {
                line.push_str(&format!(" \u{2013} {}", escape_markdown(author)));
            }
            if let Some(source) = post.source.as_deref().filter(|s| !s.is_empty()) {
                line.push_str(&format!(" ({})", escape_markdown(source)));
            }
            line.push('\n');
            out.push_str(&line);
        }
        out.push('\n');
    }

    out
}

/// Escape Markdown structure characters in text.
///
/// Backslash-escapes inline structure characters and a leading `#` so
/// feed text cannot open links, emphasis, or headings.
pub fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for (i, ch) in text.chars().enumerate() {
        match ch {
            '\\' | '`' | '*' | '_' | '[' | ']' => {
                result.push('\\');
                result.push(ch);
            }
            '#' if i == 0 => {
                result.push('\\');
                result.push(ch);
            }
            _ => result.push(ch),
        }
    }
    result
}

/// Reverse [`escape_markdown`] on text known to come from it.
pub fn unescape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some(&next) if matches!(next, '\\' | '`' | '*' | '_' | '[' | ']' | '#') => {
                    result.push(next);
                    chars.next();
                }
                _ => result.push(ch),
            }
        } else {
            result.push(ch);
        }
    }
    result
}

/// Make a link safe to put inside `[...](...)`.
fn sanitize_link(link: &str) -> String {
    link.replace(' ', "%20")
        .replace('(', "%28")
        .replace(')', "%29")
}
