//! The mdpress library converts Markdown study notes into styled PDF
//! documents by rendering them through a headless Chromium instance.
//!
//! The library favors presentation fidelity over PDF-level typesetting:
//! instead of laying out glyphs itself, it converts the Markdown to HTML,
//! applies a built-in print theme and asks a real browser engine to
//! paginate the result. Backgrounds, gradients, tables and CJK text all
//! come out exactly as the stylesheet describes them.
//!
//! Basic usage is a single call with the input path:
//! ```rust
//! use std::error::Error;
//! use std::path::Path;
//!
//! fn example() -> Result<(), Box<dyn Error>> {
//!     // learning-guide.md becomes learning-guide.pdf
//!     let pdf = mdpress::convert_file(Path::new("learning-guide.md"), None)?;
//!     println!("wrote {}", pdf.display());
//!     Ok(())
//! }
//! ```
//!
//! The conversion pipeline:
//!
//! ```text
//! +-----------+     +------------------+     +------------------+
//! | Markdown  | --> | HTML fragment    | --> | Printable page   |
//! | source    |     | - contents panel |     | - inline theme   |
//! |           |     | - highlighting   |     | - image paths    |
//! |           |     | - hard breaks    |     |   made absolute  |
//! +-----------+     +------------------+     +------------------+
//!                                                     |
//!                                                     v
//! +-----------+     +------------------+     +------------------+
//! | PDF file  | <-- | PDF bytes        | <-- | Headless         |
//! | on disk   |     | - A4 pages       |     | Chromium         |
//! |           |     | - page counter   |     | print-to-PDF     |
//! +-----------+     +------------------+     +------------------+
//! ```

pub mod highlighting;
pub mod images;
pub mod markdown;
pub mod pdf;
pub mod theme;
pub mod toc;

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::info;

/// Represents errors that can occur while converting a document.
/// This covers missing inputs, file system failures and browser-side
/// rendering problems.
#[derive(Debug)]
pub enum RenderError {
    /// The input Markdown file does not exist or is not a regular file
    InputNotFound { path: String, suggestion: String },
    /// An I/O operation on the input, output or staging files failed
    Io {
        message: String,
        path: String,
        suggestion: String,
    },
    /// Launching or driving the headless browser failed
    Browser { message: String, suggestion: String },
}

impl Error for RenderError {}
impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RenderError::InputNotFound { path, suggestion } => {
                write!(f, "❌ File Error: Markdown file not found")?;
                write!(f, "\n📁 Path: {}", path)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            RenderError::Io {
                message,
                path,
                suggestion,
            } => {
                write!(f, "❌ File Error: {}", message)?;
                write!(f, "\n📁 Path: {}", path)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
            RenderError::Browser {
                message,
                suggestion,
            } => {
                write!(f, "❌ Browser Error: {}", message)?;
                write!(f, "\n💡 Suggestion: {}", suggestion)?;
                Ok(())
            }
        }
    }
}

impl RenderError {
    /// Creates an input-not-found error for the given path
    pub fn input_not_found(path: impl Into<String>) -> Self {
        RenderError::InputNotFound {
            path: path.into(),
            suggestion: "Check the file path for typos and make sure the file exists"
                .to_string(),
        }
    }

    /// Creates an I/O error with a generic recovery hint
    pub fn io(message: impl Into<String>, path: impl Into<String>) -> Self {
        RenderError::Io {
            message: message.into(),
            path: path.into(),
            suggestion: "Check file permissions and available disk space".to_string(),
        }
    }

    /// Creates a browser error pointing at the Chromium requirement
    pub fn browser(message: impl Into<String>) -> Self {
        RenderError::Browser {
            message: message.into(),
            suggestion: "Make sure Chrome or Chromium is installed and can be launched"
                .to_string(),
        }
    }
}

/// Derives the output path for an input document: `notes.md` becomes
/// `notes.pdf`, while a name without an `md` extension keeps its full
/// name and gains a `.pdf` suffix (`readme.md.bak` becomes
/// `readme.md.bak.pdf`).
pub fn default_output_path(input: &Path) -> PathBuf {
    let is_markdown = input
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false);
    if is_markdown {
        input.with_extension("pdf")
    } else {
        let mut name = input.as_os_str().to_os_string();
        name.push(".pdf");
        PathBuf::from(name)
    }
}

/// Converts Markdown content into PDF bytes.
///
/// When `base_dir` is given, relative image paths in the document are
/// resolved against it and rewritten to `file://` URLs so the browser
/// can load them from the staged page.
///
/// # Example
/// ```rust
/// use std::error::Error;
/// use std::fs;
///
/// fn example() -> Result<(), Box<dyn Error>> {
///     let markdown = "# Hello World\nThis is a test.";
///     let bytes = mdpress::convert_string(markdown, None)?;
///
///     // Save to file or send over the network
///     fs::write("output.pdf", bytes)?;
///     Ok(())
/// }
/// ```
pub fn convert_string(markdown: &str, base_dir: Option<&Path>) -> Result<Vec<u8>, RenderError> {
    let mut body = markdown::to_html(markdown);
    if let Some(base) = base_dir {
        body = images::ImageRewriter::new(base).rewrite(&body);
    }
    let document = theme::render_document(&body);
    pdf::render_to_pdf(&document)
}

/// Converts a Markdown file into a PDF file and returns the path the PDF
/// was written to.
///
/// When `output` is `None` the destination is derived from the input
/// name, see [`default_output_path`]. Relative image paths resolve
/// against the input file's directory.
///
/// # Example
/// ```rust
/// use std::error::Error;
/// use std::path::Path;
///
/// fn example() -> Result<(), Box<dyn Error>> {
///     // Derive the output name from the input
///     mdpress::convert_file(Path::new("learning-guide.md"), None)?;
///
///     // Or choose it explicitly
///     mdpress::convert_file(
///         Path::new("learning-guide.md"),
///         Some(Path::new("out/guide.pdf")),
///     )?;
///     Ok(())
/// }
/// ```
pub fn convert_file(input: &Path, output: Option<&Path>) -> Result<PathBuf, RenderError> {
    if !input.is_file() {
        return Err(RenderError::input_not_found(input.display().to_string()));
    }

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(input),
    };
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(RenderError::Io {
                message: "output directory does not exist".to_string(),
                path: parent.display().to_string(),
                suggestion: format!("Create the directory first: mkdir -p {}", parent.display()),
            });
        }
    }

    let markdown = fs::read_to_string(input).map_err(|e| {
        RenderError::io(
            format!("failed to read input: {}", e),
            input.display().to_string(),
        )
    })?;
    info!("converting {} ({} bytes)", input.display(), markdown.len());

    let bytes = convert_string(&markdown, input.parent())?;

    fs::write(&output, &bytes).map_err(|e| RenderError::Io {
        message: format!("failed to write PDF: {}", e),
        path: output.display().to_string(),
        suggestion: write_failure_suggestion(&e),
    })?;

    Ok(output)
}

fn write_failure_suggestion(e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::PermissionDenied => {
            "Check that you have write permissions for this location".to_string()
        }
        io::ErrorKind::NotFound => "Make sure the output directory exists".to_string(),
        _ => "Try a different output path or check available disk space".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_replaces_md_extension() {
        assert_eq!(
            default_output_path(Path::new("notes.md")),
            PathBuf::from("notes.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("docs/learning-guide.md")),
            PathBuf::from("docs/learning-guide.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("my.mdbook.md")),
            PathBuf::from("my.mdbook.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("NOTES.MD")),
            PathBuf::from("NOTES.pdf")
        );
    }

    #[test]
    fn test_default_output_path_appends_for_other_names() {
        assert_eq!(
            default_output_path(Path::new("readme.md.bak")),
            PathBuf::from("readme.md.bak.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("notes")),
            PathBuf::from("notes.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("notes.markdown")),
            PathBuf::from("notes.markdown.pdf")
        );
    }

    #[test]
    fn test_convert_file_rejects_missing_input() {
        let err = convert_file(Path::new("definitely-not-here.md"), None).unwrap_err();
        assert!(matches!(err, RenderError::InputNotFound { .. }));
        let rendered = err.to_string();
        assert!(rendered.contains("definitely-not-here.md"));
        assert!(rendered.contains("💡"));
    }

    #[test]
    fn test_convert_file_rejects_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("notes.md");
        fs::write(&input, "# T\n").unwrap();

        let output = dir.path().join("missing/out.pdf");
        let err = convert_file(&input, Some(&output)).unwrap_err();
        match err {
            RenderError::Io { suggestion, .. } => assert!(suggestion.contains("mkdir -p")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_error_display_carries_suggestions() {
        let rendered = RenderError::browser("boom").to_string();
        assert!(rendered.contains("❌ Browser Error: boom"));
        assert!(rendered.contains("💡 Suggestion:"));
    }
}
