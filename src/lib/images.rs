//! Local image path rewriting for rendered HTML.
//!
//! The generated HTML is loaded by the browser from a temporary file, so
//! relative image references in the source document would resolve against
//! the temp directory and break. This module rewrites them to absolute
//! `file://` URLs anchored at the document's own directory.
//!
//! # Features
//! - Rewrite relative `src` attributes in `<img>` tags to `file://` URLs
//! - Leave remote (`http://`, `https://`), `file://`, `data:` and
//!   absolute-path sources untouched
//! - Only rewrite paths that actually exist on disk

use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::{debug, warn};
use regex::{NoExpand, Regex};
use url::Url;

lazy_static! {
    static ref IMG_TAG: Regex = Regex::new(r"<img[^>]+>").unwrap();
    static ref SRC_ATTR: Regex = Regex::new(r#"src="([^"]+)""#).unwrap();
}

/// Rewrites relative image sources in an HTML fragment for a document
/// rooted at a fixed base directory.
///
/// # Example
///
/// ```
/// use mdpress::images::ImageRewriter;
/// use std::path::Path;
///
/// let rewriter = ImageRewriter::new(Path::new("docs"));
/// let html = r#"<img src="missing.png">"#;
/// // nothing at docs/missing.png, so the tag is left alone
/// assert_eq!(rewriter.rewrite(html), html);
/// ```
pub struct ImageRewriter {
    /// Directory relative image paths resolve against
    base_dir: PathBuf,
}

impl ImageRewriter {
    /// Create a rewriter resolving relative paths against `base_dir`,
    /// normally the directory containing the source document.
    pub fn new(base_dir: &Path) -> Self {
        Self {
            base_dir: base_dir.to_path_buf(),
        }
    }

    /// Rewrite every `<img>` tag whose `src` is a relative path to an
    /// existing file. All other tags pass through unchanged.
    pub fn rewrite(&self, html: &str) -> String {
        IMG_TAG
            .replace_all(html, |captures: &regex::Captures| {
                self.rewrite_tag(&captures[0])
            })
            .into_owned()
    }

    fn rewrite_tag(&self, tag: &str) -> String {
        let src = match SRC_ATTR.captures(tag) {
            Some(captures) => captures[1].to_string(),
            None => return tag.to_string(),
        };

        if !is_relative_source(&src) {
            return tag.to_string();
        }

        let resolved = self.base_dir.join(&src);
        if !resolved.exists() {
            debug!(
                "[ImageRewriter] '{}' not found under {}, leaving as-is",
                src,
                self.base_dir.display()
            );
            return tag.to_string();
        }

        let absolute = match resolved.canonicalize() {
            Ok(path) => path,
            Err(e) => {
                warn!(
                    "[ImageRewriter] Failed to canonicalize {}: {}",
                    resolved.display(),
                    e
                );
                return tag.to_string();
            }
        };
        let file_url = match Url::from_file_path(&absolute) {
            Ok(url) => url,
            Err(()) => {
                warn!(
                    "[ImageRewriter] Path is not representable as a file URL: {}",
                    absolute.display()
                );
                return tag.to_string();
            }
        };

        // progress lines share stdout with the CLI banners
        println!("  ✓ Fixed image path: {} -> {}", src, file_url);
        SRC_ATTR
            .replace(tag, NoExpand(&format!(r#"src="{}""#, file_url)))
            .into_owned()
    }
}

/// A source is relative when it carries no URL scheme we recognize and
/// does not start from the filesystem root.
fn is_relative_source(src: &str) -> bool {
    const SKIPPED: [&str; 4] = ["http://", "https://", "file://", "data:"];
    if SKIPPED.iter().any(|prefix| src.starts_with(prefix)) {
        return false;
    }
    !src.starts_with('/')
}
