//! HTML parsing and DOM access.
//!
//! This module provides the [`Document`] and [`Element`] types used by every
//! other stage of the clipper. A Document is a read-only snapshot of a page:
//! the parsed tree plus the URL it was loaded from, which metadata
//! extraction and URL resolution need.
//!
//! # Example
//!
//! ```rust
//! use clipdown_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse_with_url(html, "https://example.com/post").unwrap();
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! assert_eq!(doc.base_url().unwrap().host_str(), Some("example.com"));
//! ```

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::{ClipError, Result};

/// Represents a parsed HTML document.
///
/// A Document wraps a parsed page and provides methods for querying elements
/// using CSS selectors. Parsing never fails on malformed markup: the HTML5
/// tree builder repairs it the way a browser would.
///
/// # Example
///
/// ```rust
/// use clipdown_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
    source_url: Option<String>,
    base_url: Option<Url>,
}

impl Document {
    /// Parses a full HTML document without an associated URL.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html, source_url: None, base_url: None })
    }

    /// Parses a full HTML document loaded from `url`.
    ///
    /// The URL is kept verbatim for metadata. If it parses, it also becomes
    /// the base for resolving relative links and the favicon; an unparsable
    /// URL is not an error, relative references are simply left alone.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clipdown_core::parse::Document;
    ///
    /// let doc = Document::parse_with_url("<p>Hi</p>", "not a url").unwrap();
    /// assert_eq!(doc.source_url(), Some("not a url"));
    /// assert!(doc.base_url().is_none());
    /// ```
    pub fn parse_with_url(html: &str, url: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        let base_url = Url::parse(url).ok();

        Ok(Self { html, source_url: Some(url.to_string()), base_url })
    }

    /// Parses an HTML fragment, such as a selection or a stored snippet.
    ///
    /// Fragment nodes end up as children of a synthetic `<html>` root
    /// element, returned by [`Document::root`].
    pub fn parse_fragment(html: &str) -> Self {
        Self { html: Html::parse_fragment(html), source_url: None, base_url: None }
    }

    /// Gets the URL the document was loaded from, as given.
    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Gets the parsed base URL, if the source URL was valid.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Gets the underlying `scraper::Html` instance.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the entire document serialized back to HTML.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// Gets the root element (`<html>`).
    pub fn root(&self) -> Element<'_> {
        Element { element: self.html.root_element() }
    }

    /// Gets the `<body>` element, if the tree has one.
    pub fn body(&self) -> Option<Element<'_>> {
        self.select_first("body")
    }

    /// Selects elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ClipError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use clipdown_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        Ok(self.html.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Selects the first element matching a CSS selector.
    ///
    /// Invalid selectors match nothing.
    pub fn select_first(&self, selector: &str) -> Option<Element<'_>> {
        let sel = Selector::parse(selector).ok()?;
        self.html.select(&sel).next().map(|el| Element { element: el })
    }

    /// Gets the trimmed text of the `<title>` element, if non-empty.
    pub fn title(&self) -> Option<String> {
        let text = self.select_first("title")?.text();
        let text = text.trim();
        if text.is_empty() { None } else { Some(text.to_string()) }
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ClipError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// A wrapper around scraper's ElementRef.
///
/// Element represents a single node in the document tree and provides
/// methods for accessing its attributes, text content, and descendants.
///
/// # Example
///
/// ```rust
/// use clipdown_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Gets the HTML inside this element, excluding its own tags.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the HTML of this element including its own tags.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name (e.g., "div", "a", "span").
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ClipError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }

    /// Gets the wrapped `scraper` element for tree walks.
    pub(crate) fn element_ref(&self) -> ElementRef<'a> {
        self.element
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.element.id() == other.element.id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>  Test Page  </title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.title(), Some("Test Page".to_string()));
        assert!(doc.source_url().is_none());
    }

    #[test]
    fn test_parse_with_url() {
        let doc = Document::parse_with_url(SAMPLE_HTML, "https://example.com/a/b").unwrap();
        assert_eq!(doc.source_url(), Some("https://example.com/a/b"));
        assert_eq!(doc.base_url().map(|u| u.as_str()), Some("https://example.com/a/b"));
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_element_attributes() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let link = doc.select_first("a").unwrap();

        assert_eq!(link.attr("href"), Some("https://example.com"));
        assert_eq!(link.attr("title"), None);
        assert_eq!(link.tag_name(), "a");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(ClipError::HtmlParseError(_))));
        assert!(doc.select_first("[[invalid").is_none());
    }

    #[test]
    fn test_body_and_fragment_root() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert!(doc.body().unwrap().text().contains("Paragraph 1"));

        let fragment = Document::parse_fragment("<em>x</em> y");
        assert_eq!(fragment.root().text(), "x y");
    }

    #[test]
    fn test_element_identity() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let paragraphs = doc.select("p").unwrap();
        let first = doc.select_first("p.content").unwrap();

        assert_eq!(paragraphs[0], first);
        assert_ne!(paragraphs[1], first);
    }

    #[test]
    fn test_empty_title_is_none() {
        let doc = Document::parse("<html><head><title>   </title></head></html>").unwrap();
        assert_eq!(doc.title(), None);
    }
}
