//! Read-only report contract.
//!
//! The view layer renders returned Markdown; this crate only hands it over.

/// One returned report: Markdown text, optionally paired with the image it
/// was derived from (a data URL, for the tongue form).
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub markdown: String,
    pub image: Option<String>,
}

impl Report {
    pub fn text(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            image: None,
        }
    }

    pub fn with_image(markdown: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            image: Some(image.into()),
        }
    }
}

/// Consumer of freshly returned reports. Implementations render; they never
/// mutate session state.
pub trait ReportSink: Send {
    fn present(&mut self, report: &Report);
}
