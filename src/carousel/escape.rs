//! Context-aware output escaping.
//!
//! Each helper targets one syntactic context of an HTML fragment. The render
//! template escapes every interpolated value through minijinja's HTML
//! auto-escaping; the helpers here cover what auto-escaping cannot: URL
//! scheme checks, line-break conversion and HTML comments.

use crate::sanitize::ALLOWED_SCHEMES;

/// Escapes for a double- or single-quoted attribute value.
pub fn attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes for element text content.
pub fn text(value: &str) -> String {
    attr(value)
}

/// Plain text with line breaks turned into `<br>`. Everything else is escaped.
pub fn nl2br(value: &str) -> String {
    value
        .split('\n')
        .map(text)
        .collect::<Vec<_>>()
        .join("<br>\n")
}

/// An `href`/`src` value, or an empty string when the URL must not be emitted.
///
/// Absolute URLs need an allowed scheme. Scheme-less URLs (paths, fragments,
/// queries) pass through.
pub fn url(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || !is_safe_url(trimmed) {
        return String::new();
    }
    attr(trimmed)
}

fn is_safe_url(value: &str) -> bool {
    if value.chars().any(|c| c.is_control()) {
        return false;
    }
    let end_of_scheme = value.find(['/', '?', '#']).unwrap_or(value.len());
    match value[..end_of_scheme].find(':') {
        None => true,
        Some(colon) => {
            let scheme = value[..colon].to_ascii_lowercase();
            ALLOWED_SCHEMES.contains(&scheme.as_str())
        }
    }
}

/// Text placed inside `<!-- ... -->`.
pub fn comment(value: &str) -> String {
    attr(value).replace("--", "-&#45;")
}
