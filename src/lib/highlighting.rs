//! Syntax highlighting for fenced code blocks using syntect.
//!
//! Blocks are rendered to HTML with inline styles so the result needs no
//! extra stylesheet. The theme is dark to match the code panels in the
//! built-in print theme.

use lazy_static::lazy_static;
use log::warn;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::markdown::escape_html;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

const CODE_THEME: &str = "base16-ocean.dark";

/// Converts one fenced code block into highlighted `<pre>` markup.
///
/// `language` is the raw fence token (`rust`, `py`, possibly with trailing
/// qualifiers such as `rust,ignore`); unknown or empty languages render as
/// plain text. A highlighting failure degrades to an escaped code block
/// rather than failing the whole conversion.
pub fn highlight_block(code: &str, language: &str) -> String {
    let token = language
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()
        .unwrap_or("")
        .trim();

    let syntax = lookup_syntax(token);
    let theme = match THEME_SET.themes.get(CODE_THEME) {
        Some(theme) => theme,
        None => return plain_block(code),
    };

    match highlighted_html_for_string(code, &SYNTAX_SET, syntax, theme) {
        Ok(html) => html,
        Err(err) => {
            warn!("highlighting failed for language '{}': {}", token, err);
            plain_block(code)
        }
    }
}

/// Finds a syntax for a fence token. `find_syntax_by_token` already covers
/// names and file extensions, which handles the common aliases (`rs`,
/// `py`, `sh`).
fn lookup_syntax(token: &str) -> &'static SyntaxReference {
    if token.is_empty() {
        return SYNTAX_SET.find_syntax_plain_text();
    }
    SYNTAX_SET
        .find_syntax_by_token(token)
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text())
}

/// Escaped, unhighlighted fallback shaped like regular converter output so
/// the stylesheet still applies.
fn plain_block(code: &str) -> String {
    format!("<pre><code>{}</code></pre>\n", escape_html(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust_produces_styled_markup() {
        let html = highlight_block("fn main() {}\n", "rust");
        assert!(html.contains("<pre"));
        assert!(html.contains("style="));
        assert!(html.contains("main"));
    }

    #[test]
    fn test_unknown_language_falls_back_to_plain_text() {
        let html = highlight_block("just words\n", "nosuchlang");
        assert!(html.starts_with("<pre"));
        assert!(html.contains("just words"));
    }

    #[test]
    fn test_empty_language_renders_as_plain_text() {
        let html = highlight_block("plain\n", "");
        assert!(html.contains("plain"));
    }

    #[test]
    fn test_fence_token_with_qualifiers() {
        let html = highlight_block("let x = 1;\n", "rust,ignore");
        assert!(html.contains("style="));
        assert!(html.contains("let"));
    }

    #[test]
    fn test_extension_aliases_resolve() {
        assert_eq!(lookup_syntax("rs").name, "Rust");
        assert_eq!(lookup_syntax("python").name, "Python");
    }

    #[test]
    fn test_plain_block_escapes_markup() {
        let html = plain_block("<script>alert(1)</script>");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
