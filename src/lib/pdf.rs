//! PDF generation through a headless browser.
//!
//! The assembled HTML document is staged in a temporary file and handed
//! to a headless Chromium instance, which paginates it with the DevTools
//! print endpoint. Printing through a real browser engine keeps the PDF
//! output identical to what the print stylesheet describes, including
//! backgrounds, gradients and CJK text.
//!
//! The browser process and the staged file are scoped to a single call:
//! both are torn down when the call returns, whether printing succeeded
//! or failed.

use std::io::Write;
use std::time::Duration;

use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::Browser;
use log::debug;
use url::Url;

use crate::RenderError;

/// A4 paper in inches, the unit the DevTools print endpoint expects.
const PAPER_WIDTH_IN: f64 = 8.27;
const PAPER_HEIGHT_IN: f64 = 11.69;

/// 2cm margins, widened to 2.5cm at the bottom to clear the footer.
const MARGIN_TOP_IN: f64 = 0.79;
const MARGIN_RIGHT_IN: f64 = 0.79;
const MARGIN_BOTTOM_IN: f64 = 0.98;
const MARGIN_LEFT_IN: f64 = 0.79;

/// Upper bound on navigation and print waits so a wedged browser cannot
/// hang the conversion.
const BROWSER_TIMEOUT: Duration = Duration::from_secs(20);

/// An effectively empty header suppresses Chromium's default date and
/// title line.
const HEADER_TEMPLATE: &str = "<div></div>";

/// Centered page counter printed at the bottom of every page.
const FOOTER_TEMPLATE: &str = "<div style=\"font-size: 10px; color: #7F8C8D; width: 100%; \
     text-align: center;\">第 <span class=\"pageNumber\"></span> 页 / 共 <span \
     class=\"totalPages\"></span> 页</div>";

/// Renders a complete HTML document to PDF bytes.
///
/// The document is written to a temporary `.html` file so the browser
/// loads it over `file://`, which keeps absolute `file://` image URLs
/// resolvable. The file is removed when this function returns.
pub fn render_to_pdf(html: &str) -> Result<Vec<u8>, RenderError> {
    let mut page = tempfile::Builder::new()
        .prefix("mdpress-")
        .suffix(".html")
        .tempfile()
        .map_err(|e| {
            RenderError::io(
                format!("failed to create temporary page: {}", e),
                std::env::temp_dir().display().to_string(),
            )
        })?;
    page.write_all(html.as_bytes()).map_err(|e| {
        RenderError::io(
            format!("failed to write temporary page: {}", e),
            page.path().display().to_string(),
        )
    })?;
    page.flush().map_err(|e| {
        RenderError::io(
            format!("failed to flush temporary page: {}", e),
            page.path().display().to_string(),
        )
    })?;

    let page_url = Url::from_file_path(page.path())
        .map_err(|_| {
            RenderError::browser(format!(
                "temporary page path is not a valid file URL: {}",
                page.path().display()
            ))
        })?
        .to_string();
    debug!("staged print page at {}", page.path().display());

    // the staged file must outlive the browser session reading it
    print_page(&page_url)
}

/// Drives the browser: open a tab, load the staged page, wait for the
/// load to settle and request a paginated print.
fn print_page(page_url: &str) -> Result<Vec<u8>, RenderError> {
    let browser = Browser::default()
        .map_err(|e| RenderError::browser(format!("failed to launch browser: {}", e)))?;
    let tab = browser
        .new_tab()
        .map_err(|e| RenderError::browser(format!("failed to open tab: {}", e)))?;
    tab.set_default_timeout(BROWSER_TIMEOUT);

    tab.navigate_to(page_url)
        .map_err(|e| RenderError::browser(format!("failed to load page: {}", e)))?;
    tab.wait_until_navigated()
        .map_err(|e| RenderError::browser(format!("page did not finish loading: {}", e)))?;

    tab.print_to_pdf(Some(print_options()))
        .map_err(|e| RenderError::browser(format!("print to PDF failed: {}", e)))
}

fn print_options() -> PrintToPdfOptions {
    PrintToPdfOptions {
        display_header_footer: Some(true),
        print_background: Some(true),
        paper_width: Some(PAPER_WIDTH_IN),
        paper_height: Some(PAPER_HEIGHT_IN),
        margin_top: Some(MARGIN_TOP_IN),
        margin_bottom: Some(MARGIN_BOTTOM_IN),
        margin_left: Some(MARGIN_LEFT_IN),
        margin_right: Some(MARGIN_RIGHT_IN),
        header_template: Some(HEADER_TEMPLATE.to_string()),
        footer_template: Some(FOOTER_TEMPLATE.to_string()),
        ..Default::default()
    }
}
