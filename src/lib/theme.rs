//! Print theme and document assembly.
//!
//! The stylesheet and page shell are compiled into the binary so a
//! generated document never references files that may not exist on the
//! machine running the browser.

/// Stylesheet applied to every generated document.
pub const THEME_CSS: &str = include_str!("../../assets/theme.css");

const PAGE_TEMPLATE: &str = include_str!("../../assets/page.html");

/// Wraps a converted HTML body in the full printable page, with the
/// theme inlined in a `<style>` block.
pub fn render_document(body: &str) -> String {
    PAGE_TEMPLATE
        .replace("{{theme}}", THEME_CSS)
        .replace("{{content}}", body)
}
