//! Clip input and output types.
//!
//! A [`Page`] is the snapshot a clip works from: the serialized document, the
//! address it was loaded from and, optionally, the user's selection. A
//! [`ScrapResult`] is what comes out: Markdown content plus the metadata that
//! describes it, ready to hand to storage or transport.

use crate::formatters::json::{JsonConfig, scrap_to_json};
use crate::metadata::PageMetadata;
use crate::Result;
use serde::{Deserialize, Serialize};

/// Output format options for a scrap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The Markdown content (header included when requested).
    #[default]
    Markdown,
    /// The whole scrap as JSON.
    Json,
}

/// A snapshot of the page being clipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Serialized document HTML.
    pub html: String,

    /// Address the document was loaded from (after redirects).
    pub url: String,

    /// Serialized contents of the current selection range, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_html: Option<String>,
}

impl Page {
    /// Creates a page snapshot without a selection.
    pub fn new(html: impl Into<String>, url: impl Into<String>) -> Self {
        Self { html: html.into(), url: url.into(), selection_html: None }
    }

    /// Attaches the serialized selection range.
    pub fn with_selection(mut self, selection_html: impl Into<String>) -> Self {
        self.selection_html = Some(selection_html.into());
        self
    }

    /// The selection HTML, unless nothing or only whitespace is selected.
    ///
    /// A collapsed selection (a caret with no extent) serializes to an empty
    /// or whitespace-only fragment and counts as no selection.
    pub fn selection(&self) -> Option<&str> {
        self.selection_html
            .as_deref()
            .filter(|html| !crate::Document::parse_fragment(html).root().text().trim().is_empty())
    }
}

/// The result of clipping a page.
///
/// Created once by the clipper and never changed afterwards; it holds no
/// references into the parsed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapResult {
    /// Markdown content, with the metadata header prepended when enabled.
    pub content: String,

    /// Metadata extracted from the whole page.
    pub metadata: PageMetadata,

    /// Whether only the selection was clipped.
    pub selection_only: bool,

    /// Clip time as an RFC 3339 UTC timestamp.
    pub timestamp: String,
}

impl ScrapResult {
    /// Renders the scrap in the requested format.
    pub fn to_format(&self, format: OutputFormat, json: &JsonConfig) -> Result<String> {
        match format {
            OutputFormat::Markdown => Ok(self.content.clone()),
            OutputFormat::Json => scrap_to_json(self, json),
        }
    }

    /// Gets the scrap as a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ScrapResult {
        ScrapResult {
            content: "# Title\n\nBody".to_string(),
            metadata: PageMetadata {
                title: "Title".to_string(),
                url: "https://example.com/a".to_string(),
                site_name: "example.com".to_string(),
                ..Default::default()
            },
            selection_only: false,
            timestamp: "2024-05-01T12:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_page_selection_filters_collapsed() {
        let page = Page::new("<p>x</p>", "https://example.com/");
        assert_eq!(page.selection(), None);

        let collapsed = page.clone().with_selection("  \n ");
        assert_eq!(collapsed.selection(), None);

        let empty_markup = page.clone().with_selection("<span> </span>");
        assert_eq!(empty_markup.selection(), None);

        let selected = page.with_selection("<b>chosen</b>");
        assert_eq!(selected.selection(), Some("<b>chosen</b>"));
    }

    #[test]
    fn test_scrap_json_keys() {
        let value = sample().to_json().unwrap();

        assert_eq!(value["selectionOnly"], false);
        assert_eq!(value["metadata"]["siteName"], "example.com");
        assert_eq!(value["timestamp"], "2024-05-01T12:00:00.000Z");
        assert!(value["metadata"].get("author").is_none());
    }

    #[test]
    fn test_scrap_deserializes() {
        let json = r#"{
            "content": "text",
            "metadata": {"title": "T", "url": "u", "siteName": "s", "author": "A"},
            "selectionOnly": true,
            "timestamp": "2024-01-01T00:00:00.000Z"
        }"#;
        let scrap: ScrapResult = serde_json::from_str(json).unwrap();

        assert!(scrap.selection_only);
        assert_eq!(scrap.metadata.author.as_deref(), Some("A"));
        assert_eq!(scrap.metadata.published_date, None);
    }

    #[test]
    fn test_to_format() {
        let scrap = sample();
        let config = JsonConfig::default();

        assert_eq!(scrap.to_format(OutputFormat::Markdown, &config).unwrap(), scrap.content);
        assert!(scrap.to_format(OutputFormat::Json, &config).unwrap().starts_with("{\"content\""));
    }
}
