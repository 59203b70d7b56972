//! Projections of a document: export HTML, JSON snapshots and the live preview.

pub mod html;
pub mod json;
pub mod preview;

pub use html::HtmlConfig;
pub use json::ParseError;

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
