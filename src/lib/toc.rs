//! Table-of-contents support: marker insertion, heading anchors, and the
//! rendered contents panel.
//!
//! A paragraph containing only `[TOC]` is replaced during conversion by a
//! nested list of links to every heading in the document. When a document
//! has no marker but opens with a top-level heading, one is inserted right
//! after that heading so study notes get a contents page without asking
//! for it.

use crate::markdown::escape_html;
use deunicode::deunicode;
use std::collections::HashMap;
use std::fmt::Write;

/// A heading collected from the document, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `h1` through 6 for `h6`.
    pub level: u8,
    /// Plain text content with inline markup flattened.
    pub text: String,
    /// Anchor id, either explicit (`{#id}`) or a generated slug.
    pub id: String,
}

/// Inserts a `[TOC]` line after the first `# ` heading unless `[TOC]`
/// already occurs anywhere in the text. The occurrence check is a plain
/// substring match: a document that merely mentions the marker, even in
/// prose or a code fence, is left alone. Heading detection does skip
/// fenced code blocks, so a `# comment` in a shell snippet does not
/// receive the marker.
pub fn ensure_marker(markdown: &str) -> String {
    if markdown.contains("[TOC]") {
        return markdown.to_string();
    }

    let mut fence: Option<&str> = None;
    let mut first_heading: Option<usize> = None;

    for (idx, line) in markdown.lines().enumerate() {
        let trimmed = line.trim_start();
        if let Some(closer) = fence {
            if trimmed.starts_with(closer) {
                fence = None;
            }
            continue;
        }
        if trimmed.starts_with("```") {
            fence = Some("```");
            continue;
        }
        if trimmed.starts_with("~~~") {
            fence = Some("~~~");
            continue;
        }
        if line.starts_with("# ") {
            first_heading = Some(idx);
            break;
        }
    }

    let Some(at) = first_heading else {
        return markdown.to_string();
    };

    let mut lines: Vec<&str> = markdown.lines().collect();
    lines.insert(at + 1, "");
    lines.insert(at + 2, "[TOC]");
    lines.insert(at + 3, "");
    lines.join("\n")
}

/// Builds an anchor slug from heading text: transliterate to ASCII,
/// lowercase, keep alphanumerics, collapse everything else into single
/// hyphens. Headings that reduce to nothing get a stable fallback.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut prev_hyphen = true;
    for ch in ascii.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            slug.push(lower);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

/// Hands out anchor ids, suffixing repeats so a second `Intro` heading
/// becomes `intro-2` instead of clashing with the first.
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an explicit id so generated slugs never collide with it.
    pub fn reserve(&mut self, id: &str) {
        self.seen.entry(id.to_string()).or_insert(1);
    }

    pub fn slug(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{}-{}", base, *count)
        }
    }
}

/// Renders the collected headings as the contents panel markup: a
/// `<div class="toc">` holding nested link lists that mirror heading depth.
pub fn build_html(headings: &[Heading]) -> String {
    if headings.is_empty() {
        return String::new();
    }

    let base = headings.iter().map(|h| h.level).min().unwrap_or(1);

    // Depths are clamped so each step nests at most one level deeper than
    // the previous entry; open and close counts stay balanced even for
    // documents that jump from h1 straight to h4.
    let mut depths = Vec::with_capacity(headings.len());
    let mut prev = 0usize;
    for heading in headings {
        let wanted = usize::from(heading.level.saturating_sub(base)) + 1;
        let depth = wanted.min(prev + 1);
        depths.push(depth);
        prev = depth;
    }

    let mut html = String::from("<div class=\"toc\">\n<ul>\n");
    let mut prev = 1usize;
    for (index, (heading, depth)) in headings.iter().zip(depths).enumerate() {
        if index > 0 {
            if depth > prev {
                html.push_str("\n<ul>\n");
            } else {
                html.push_str("</li>\n");
                for _ in depth..prev {
                    html.push_str("</ul>\n</li>\n");
                }
            }
        }
        let _ = write!(
            html,
            "<li><a href=\"#{}\">{}</a>",
            heading.id,
            escape_html(&heading.text)
        );
        prev = depth;
    }
    html.push_str("</li>\n");
    for _ in 1..prev {
        html.push_str("</ul>\n</li>\n");
    }
    html.push_str("</ul>\n</div>\n");
    html
}
