//! Placeholder expansion for whole pages.
//!
//! A page embeds a slider with `[carousel id="home"]` (the tag name is
//! configurable). [`expand_embeds`] replaces each placeholder with the
//! fragment the render callback produces for it. The callback is expected to
//! share one [`crate::render::RenderContext`] across the page so repeated
//! embeds of the same slider get distinct instance ids.
//!
//! Expansion never fails: a render error becomes a diagnostic comment in place
//! of the placeholder.

use crate::error::{CarouselError, Result, ValidationError};
use crate::render::{EmptyReason, Fragment};
use crate::sanitize::sanitize_slider_id;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

pub const DEFAULT_TAG: &str = "carousel";

pub const MSG_TAG_FORMAT: &str =
    "embed-tag can only contain lowercase letters, numbers, '-' and '_'";

static TAG_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("valid regex"));

static ID_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)id\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"']+))"#).expect("valid regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub span: Range<usize>,
    /// Normalized slider id; empty when the placeholder has none.
    pub slider_id: String,
}

pub fn is_valid_tag(tag: &str) -> bool {
    TAG_NAME.is_match(tag)
}

fn placeholder_regex(tag: &str) -> Result<Regex> {
    if !is_valid_tag(tag) {
        return Err(ValidationError::new(MSG_TAG_FORMAT).into());
    }
    let pattern = format!(r"\[{}(\s[^\]]*)?\]", regex::escape(tag));
    Regex::new(&pattern).map_err(|e| ValidationError::new(e.to_string()).into())
}

/// All placeholders for `tag` in `page`, in document order.
pub fn find_placeholders(page: &str, tag: &str) -> Result<Vec<Placeholder>> {
    let re = placeholder_regex(tag)?;
    Ok(re
        .captures_iter(page)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            Some(Placeholder {
                span: whole.range(),
                slider_id: parse_id(attrs),
            })
        })
        .collect())
}

fn parse_id(attrs: &str) -> String {
    ID_ATTR
        .captures(attrs)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| sanitize_slider_id(m.as_str()))
        .unwrap_or_default()
}

pub fn expand_embeds<F>(page: &str, tag: &str, mut render: F) -> Result<String>
where
    F: FnMut(&str) -> Result<Fragment>,
{
    let placeholders = find_placeholders(page, tag)?;
    if placeholders.is_empty() {
        return Ok(page.to_string());
    }

    let mut out = String::with_capacity(page.len());
    let mut cursor = 0;
    for placeholder in placeholders {
        out.push_str(&page[cursor..placeholder.span.start]);
        let fragment = if placeholder.slider_id.is_empty() {
            Fragment::Empty(EmptyReason::MissingId)
        } else {
            match render(&placeholder.slider_id) {
                Ok(fragment) => fragment,
                Err(e) => {
                    tracing::warn!(
                        slider = %placeholder.slider_id,
                        error = %e,
                        "embed failed to render"
                    );
                    Fragment::Empty(EmptyReason::Failed(placeholder.slider_id.clone()))
                }
            }
        };
        out.push_str(&fragment.html());
        cursor = placeholder.span.end;
    }
    out.push_str(&page[cursor..]);
    Ok(out)
}
